#![warn(missing_docs, unused)]
//! # `pairmill` BPE Vocabulary Trainer
//!
//! Trains byte-level Byte Pair Encoding vocabularies. Given a UTF-8 corpus,
//! a target vocab size, and a list of special-token strings, training
//! produces a ``{id -> bytes}`` vocabulary and the ordered merge list that
//! reconstructs the tokenizer's encoding behavior.
//!
//! ## Summary
//!
//! * [`train_bpe`] - the one-call entry point.
//! * [`BpeTrainer`] and [`BpeTrainerOptions`] - the layered trainer API.
//! * [`training`] - the incremental merge engine: pair priority queue,
//!   corpus rewriting, vocabulary assembly.
//! * [`pretokenize`] - parallel corpus pretokenization over a read-only
//!   memory mapping, with special tokens as hard cut points.
//! * [`corpus`] - the mutable corpus index: interned symbols, per-pretoken
//!   sequences, and live pair statistics.
//!
//! ## `TokenType` and `CountType`
//!
//! The trainer is parameterized over an abstract primitive integer
//! [`TokenType`] for symbol ids (choose from ``{ u16, u32, u64 }`` wide
//! enough for the vocab) and a [`CountType`] for occurrence counts (wide
//! enough for the corpus; `u64` by default).
//!
//! ## Example
//!
//! ```rust,no_run
//! use pairmill::{PmResult, train_bpe};
//!
//! fn example() -> PmResult<()> {
//!     let (vocab, merges) = train_bpe("corpus.txt", 32_000, &["<|endoftext|>"])?;
//!     assert!(vocab.len() <= 32_000);
//!     assert_eq!(vocab.len(), 256 + 1 + merges.len());
//!     Ok(())
//! }
//! ```

pub mod corpus;
pub mod pretokenize;
pub mod training;

mod errors;
mod types;

#[doc(inline)]
pub use errors::*;
#[doc(inline)]
pub use training::{
    BpeTrainer, BpeTrainerOptions, SpecialTokenPlacement, TrainedVocab, train_bpe,
};
#[doc(inline)]
pub use types::*;
