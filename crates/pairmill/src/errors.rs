//! # Error Types

/// Errors from pairmill operations.
#[derive(Debug, thiserror::Error)]
pub enum PairmillError {
    /// I/O error while reading the corpus.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The word split pattern failed to compile.
    #[error("word pattern compilation failed: {0}")]
    WordPattern(Box<fancy_regex::Error>),

    /// The special-token union failed to compile.
    #[error("special-token union compilation failed: {0}")]
    SpecialTokens(Box<regex::Error>),

    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// Pair accounting broke during a merge; this is a fatal bug, not a data error.
    #[error("merge invariant violation: {0}")]
    InvariantViolation(String),
}

impl From<fancy_regex::Error> for PairmillError {
    fn from(err: fancy_regex::Error) -> Self {
        Self::WordPattern(err.into())
    }
}

impl From<regex::Error> for PairmillError {
    fn from(err: regex::Error) -> Self {
        Self::SpecialTokens(err.into())
    }
}

/// Result type for pairmill operations.
pub type PmResult<T> = core::result::Result<T, PairmillError>;
