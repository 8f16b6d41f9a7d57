//! # Vocabulary Assembler

use crate::types::{CommonHashMap, TokenType, U8_SIZE};
use crate::{PairmillError, PmResult};

/// Where special tokens sit in the id space, when they receive ids at all.
///
/// A caller policy; the merge engine never assigns special-token ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialTokenPlacement {
    /// Special ids come after the 256 byte ids and before the first merge id.
    AfterBytes,

    /// Special ids come after all merge ids.
    #[default]
    AfterMerges,
}

/// Assembles the final ``{id -> bytes}`` vocabulary.
///
/// Ids ``0..=255`` are bound to the 256 single-byte strings; each completed
/// merge appends one entry; special tokens are woven in per
/// [`SpecialTokenPlacement`]. Special tokens that receive ids count against
/// the target vocab size, so the merge budget shrinks accordingly.
#[derive(Debug, Clone)]
pub struct VocabAssembler<T: TokenType> {
    merges: Vec<Vec<u8>>,
    specials: Vec<Vec<u8>>,
    placement: SpecialTokenPlacement,
    _marker: core::marker::PhantomData<T>,
}

impl<T: TokenType> VocabAssembler<T> {
    /// Create an assembler.
    ///
    /// ## Arguments
    /// * `specials` - the special-token byte strings to weave in.
    /// * `placement` - where the special ids sit.
    pub fn new(
        specials: Vec<Vec<u8>>,
        placement: SpecialTokenPlacement,
    ) -> Self {
        Self {
            merges: Vec::new(),
            specials,
            placement,
            _marker: core::marker::PhantomData,
        }
    }

    /// The number of merges the assembler may still accept under
    /// `vocab_size`.
    ///
    /// A `vocab_size` at or below the reserved byte and special ids yields a
    /// budget of 0 (the 256-entry byte vocab is always produced).
    pub fn merge_budget(
        &self,
        vocab_size: usize,
    ) -> usize {
        vocab_size.saturating_sub(U8_SIZE + self.specials.len())
    }

    /// The number of ids assembled so far.
    pub fn len(&self) -> usize {
        U8_SIZE + self.specials.len() + self.merges.len()
    }

    /// Never true; the byte entries are always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append the symbol produced by a completed merge.
    pub fn push_merge(
        &mut self,
        bytes: Vec<u8>,
    ) {
        self.merges.push(bytes);
    }

    /// Assemble the ``{id -> bytes}`` vocabulary.
    pub fn into_vocab(self) -> PmResult<CommonHashMap<T, Vec<u8>>> {
        let mut ordered: Vec<Vec<u8>> = (0..=u8::MAX).map(|b| vec![b]).collect();
        match self.placement {
            SpecialTokenPlacement::AfterBytes => {
                ordered.extend(self.specials);
                ordered.extend(self.merges);
            }
            SpecialTokenPlacement::AfterMerges => {
                ordered.extend(self.merges);
                ordered.extend(self.specials);
            }
        }

        ordered
            .into_iter()
            .enumerate()
            .map(|(id, bytes)| {
                T::from_usize(id)
                    .ok_or(PairmillError::VocabSizeOverflow { size: id })
                    .map(|token| (token, bytes))
            })
            .collect()
    }
}
