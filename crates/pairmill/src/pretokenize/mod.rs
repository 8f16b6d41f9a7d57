//! # Pretokenization
//!
//! The merge engine operates on a frequency table of *pretokens*: byte
//! strings cut from the corpus by a fixed word-split regex, with special
//! tokens acting as hard cut points. This module owns everything up to that
//! table:
//!
//! * [`GPT2_PRETOKEN_PATTERN`] - the word split pattern.
//! * [`CorpusSplitter`] - the compiled segment and word cuts.
//! * [`find_chunk_boundaries`] - special-token-aligned corpus chunking.
//! * [`PretokenCounter`] - an incremental, in-memory pretoken counter.
//! * [`Pretokenizer`] - the file-level parallel driver.
//!
//! Pretokenization is embarrassingly parallel: the corpus is memory-mapped
//! read-only, split into chunks that begin and end at special-token cuts,
//! and each chunk is counted independently before a single reduction sums
//! the per-worker tables. The merge phase never sees any of this; its only
//! input is the reduced ``{pretoken -> count}`` table.

pub mod chunking;
pub mod counter;
pub mod patterns;
pub mod pretokenizer;
pub mod splitter;

#[doc(inline)]
pub use chunking::find_chunk_boundaries;
#[doc(inline)]
pub use counter::PretokenCounter;
#[doc(inline)]
pub use patterns::GPT2_PRETOKEN_PATTERN;
#[doc(inline)]
pub use pretokenizer::{Pretokenizer, PretokenizerOptions};
#[doc(inline)]
pub use splitter::CorpusSplitter;
