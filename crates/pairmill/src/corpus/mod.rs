//! # Corpus Index
//!
//! The mutable in-memory representation of the corpus during training:
//!
//! * [`SymbolTable`] - interned symbol bytes; pair keys are integer ids.
//! * [`PretokenBuf`] - one pretoken's current symbol sequence.
//! * [`CorpusIndex`] - all pretokens plus the global pair statistics.
//!
//! The [`CorpusIndex`] owns the two flat maps the merge engine selects and
//! rewrites through: pair occurrence counts, and a pair-to-pretoken
//! membership index. The membership index is soft in one direction: it may
//! hold pretokens that no longer contain a pair (discarded lazily when a
//! rewrite finds no matches), but every pretoken containing a live pair is
//! always present.

pub mod index;
pub mod pretoken;
pub mod symbol_table;

#[doc(inline)]
pub use index::{CorpusIndex, PairCountMap, PairIndexMap};
#[doc(inline)]
pub use pretoken::PretokenBuf;
#[doc(inline)]
pub use symbol_table::SymbolTable;
