//! # Pretoken Counter

use compact_str::CompactString;

use crate::pretokenize::splitter::CorpusSplitter;
use crate::types::{CommonHashMap, CountType, StringChunkType};

/// Incremental ``{pretoken -> count}`` accumulator over a
/// [`CorpusSplitter`].
///
/// # Parameters
/// * `K` - the type used to store pretoken keys.
/// * `C` - the type used to store counts.
pub struct PretokenCounter<K = CompactString, C = u64>
where
    K: StringChunkType,
    C: CountType,
{
    /// The segment and word splitter.
    splitter: CorpusSplitter,

    /// The accumulated pretoken counts.
    counts: CommonHashMap<K, C>,
}

impl<K, C> PretokenCounter<K, C>
where
    K: StringChunkType,
    C: CountType,
{
    /// Create a new counter.
    ///
    /// ## Arguments
    /// * `splitter` - the compiled corpus splitter.
    pub fn new(splitter: CorpusSplitter) -> Self {
        Self {
            splitter,
            counts: CommonHashMap::default(),
        }
    }

    /// The number of distinct pretokens seen so far.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Has nothing been counted?
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Release the pretoken counts and return them.
    pub fn release(self) -> CommonHashMap<K, C> {
        self.counts
    }

    /// Update counts inplace from text.
    ///
    /// ## Arguments
    /// * `text` - the text to segment and count.
    pub fn update_from_text<S: AsRef<str>>(
        &mut self,
        text: S,
    ) {
        let Self { splitter, counts } = self;
        let splitter = &*splitter;
        splitter.for_each_segment(text.as_ref(), &mut |segment| {
            for word in splitter.words(segment) {
                let key: K = word.into();
                *counts.entry(key).or_default() += C::one();
            }
        });
    }

    /// Update counts inplace from a sample iterator.
    ///
    /// ## Arguments
    /// * `samples` - An iterator over string-like samples.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for sample in samples {
            self.update_from_text(sample);
        }
    }
}
