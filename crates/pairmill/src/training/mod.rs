//! # Vocabulary Training
//!
//! The merge engine and its collaborators:
//!
//! * [`PairQueue`] - the lazy-invalidation pair priority queue.
//! * [`VocabAssembler`] - id assignment for bytes, merges, and specials.
//! * [`BpeTrainer`] - the merge loop.
//! * [`train_bpe`] - the one-call file entry point.
//!
//! Each iteration selects the most frequent pair (ties to the
//! byte-lexicographically greatest), rewrites every pretoken containing it,
//! and feeds the changed pair counts back into the queue, so selection stays
//! logarithmic instead of recounting the corpus. Training ends when the
//! merge budget is spent or no pair with count >= 1 remains.
//!
//! ## Training Example
//!
//! ```rust,no_run
//! use pairmill::{BpeTrainer, BpeTrainerOptions, PmResult};
//!
//! fn example() -> PmResult<()> {
//!     let options = BpeTrainerOptions::new(32_000)
//!         .with_special_tokens(["<|endoftext|>"]);
//!
//!     // Any unsigned id type wide enough for the vocab works; see
//!     // [`pairmill::TokenType`].
//!     let trainer: BpeTrainer<u32, u64> = options.init();
//!
//!     let trained = trainer.train_file("corpus.txt".as_ref())?;
//!     println!(
//!         "{} ids, {} merges",
//!         trained.vocab.len(),
//!         trained.merges.len()
//!     );
//!     Ok(())
//! }
//! ```

pub mod merge_queue;
pub mod trainer;
pub mod vocab;

#[doc(inline)]
pub use merge_queue::{MergeCandidate, PairQueue};
#[doc(inline)]
pub use trainer::{BpeTrainer, BpeTrainerOptions, TrainedVocab, train_bpe, try_vocab_size};
#[doc(inline)]
pub use vocab::{SpecialTokenPlacement, VocabAssembler};
