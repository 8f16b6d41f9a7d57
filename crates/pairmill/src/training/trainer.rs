//! # BPE Trainer

use std::path::Path;

use compact_str::CompactString;

use crate::corpus::index::CorpusIndex;
use crate::corpus::symbol_table::SymbolTable;
use crate::pretokenize::patterns::GPT2_PRETOKEN_PATTERN;
use crate::pretokenize::pretokenizer::{Pretokenizer, PretokenizerOptions};
use crate::training::merge_queue::PairQueue;
use crate::training::vocab::{SpecialTokenPlacement, VocabAssembler};
use crate::types::{CommonHashMap, CountType, TokenType};
use crate::{PairmillError, PmResult};

/// Validate that `vocab_size` ids fit in the token type.
///
/// ## Returns
/// The vocab size, or [`PairmillError::VocabSizeOverflow`].
pub fn try_vocab_size<T: TokenType>(vocab_size: usize) -> PmResult<usize> {
    if T::from_usize(vocab_size).is_none() {
        Err(PairmillError::VocabSizeOverflow { size: vocab_size })
    } else {
        Ok(vocab_size)
    }
}

/// Options for [`BpeTrainer`].
#[derive(Debug, Clone)]
pub struct BpeTrainerOptions {
    /// The word split pattern; compiled on the `fancy_regex` engine.
    pub pattern: String,

    /// The target vocab size. Values at or below the reserved byte and
    /// special ids produce the byte vocabulary with no merges.
    pub vocab_size: usize,

    /// Special-token strings; hard cut points for pretokenization.
    pub special_tokens: Vec<String>,

    /// Where special tokens sit in the output id space.
    pub special_placement: SpecialTokenPlacement,

    /// Parallelism hint for file pretokenization.
    pub num_chunks: usize,
}

impl BpeTrainerOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `vocab_size` - the target vocabulary size.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            pattern: GPT2_PRETOKEN_PATTERN.to_string(),
            vocab_size,
            special_tokens: Vec::new(),
            special_placement: SpecialTokenPlacement::default(),
            num_chunks: rayon::current_num_threads().max(1),
        }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the word split pattern.
    pub fn with_pattern<P: Into<String>>(
        self,
        pattern: P,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Sets the special-token strings.
    pub fn with_special_tokens<I, S>(
        self,
        special_tokens: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            special_tokens: special_tokens.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    /// Sets the special-token id placement.
    pub fn with_special_placement(
        self,
        special_placement: SpecialTokenPlacement,
    ) -> Self {
        Self {
            special_placement,
            ..self
        }
    }

    /// Sets the chunk-count parallelism hint.
    pub fn with_num_chunks(
        self,
        num_chunks: usize,
    ) -> Self {
        Self { num_chunks, ..self }
    }

    /// Initializes a [`BpeTrainer`] from these options.
    pub fn init<T, C>(self) -> BpeTrainer<T, C>
    where
        T: TokenType,
        C: CountType,
    {
        BpeTrainer::new(self)
    }
}

/// Basic training results.
#[derive(Debug, Clone)]
pub struct TrainedVocab<T: TokenType> {
    /// The ``{id -> bytes}`` vocabulary.
    pub vocab: CommonHashMap<T, Vec<u8>>,

    /// The learned merges, in application order.
    pub merges: Vec<(Vec<u8>, Vec<u8>)>,
}

/// Trainer for byte-level binary pair vocabularies.
///
/// The merge loop is deliberately single-threaded: every merge funnels its
/// pair-count updates through one shared table, which would serialize any
/// thread scaling anyway. Parallelism lives in the pretokenization phase.
///
/// # Parameters
/// * `T` - the symbol id type.
/// * `C` - the occurrence count type.
pub struct BpeTrainer<T = u32, C = u64>
where
    T: TokenType,
    C: CountType,
{
    /// Trainer options.
    pub options: BpeTrainerOptions,

    _marker: core::marker::PhantomData<(T, C)>,
}

impl<T, C> BpeTrainer<T, C>
where
    T: TokenType,
    C: CountType,
{
    /// Initializes a [`BpeTrainer`].
    ///
    /// ## Arguments
    /// * `options` - The trainer options.
    pub fn new(options: BpeTrainerOptions) -> Self {
        Self {
            options,
            _marker: core::marker::PhantomData,
        }
    }

    /// Train from a corpus file.
    ///
    /// Pretokenizes the file (in parallel, at special-token-aligned chunk
    /// cuts) and trains on the reduced count table.
    ///
    /// ## Arguments
    /// * `path` - the corpus file path.
    ///
    /// ## Returns
    /// The trained vocabulary and merges.
    pub fn train_file(
        &self,
        path: &Path,
    ) -> PmResult<TrainedVocab<T>> {
        let pretokenizer = Pretokenizer::new(
            PretokenizerOptions::default()
                .with_pattern(self.options.pattern.clone())
                .with_num_chunks(self.options.num_chunks),
            &self.options.special_tokens,
        )?;

        let counts: CommonHashMap<CompactString, C> = pretokenizer.count_file(path)?;
        self.train_from_counts(
            counts
                .into_iter()
                .map(|(key, count)| (key.as_bytes().to_vec(), count)),
        )
    }

    /// Train from a pretoken count table.
    ///
    /// The result is a function of the count table alone: neither
    /// pretokenizer parallelism nor map iteration order can change the
    /// merges list.
    ///
    /// ## Arguments
    /// * `pretoken_counts` - ``(pretoken bytes, count)`` entries.
    ///
    /// ## Returns
    /// The trained vocabulary and merges.
    pub fn train_from_counts<I, B>(
        &self,
        pretoken_counts: I,
    ) -> PmResult<TrainedVocab<T>>
    where
        I: IntoIterator<Item = (B, C)>,
        B: AsRef<[u8]>,
    {
        let vocab_size = try_vocab_size::<T>(self.options.vocab_size)?;

        let mut assembler: VocabAssembler<T> = VocabAssembler::new(
            self.options
                .special_tokens
                .iter()
                .map(|s| s.as_bytes().to_vec())
                .collect(),
            self.options.special_placement,
        );
        let num_merges = assembler.merge_budget(vocab_size);

        log::info!("starting BPE training: {num_merges} merges to compute");

        let mut corpus: CorpusIndex<T, C> = CorpusIndex::from_counts(pretoken_counts);
        let mut symbols: SymbolTable<T> = SymbolTable::new();

        log::info!(
            "built pair index: {} pretokens, {} distinct pairs",
            corpus.len(),
            corpus.pair_counts().len()
        );

        let mut queue: PairQueue<T, C> = PairQueue::with_capacity(corpus.pair_counts().len());
        for (&pair, &count) in corpus.pair_counts() {
            queue.push(pair, count);
        }

        log::info!("starting merge loop");

        let mut merges: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(num_merges);
        let mut merges_done = 0;
        let mut last_log_percent = 0;

        while merges_done < num_merges {
            let Some((pair, count)) = queue.pop_best(corpus.pair_counts(), &symbols) else {
                // No pair with count >= 1 remains.
                break;
            };

            let first = symbols.bytes(pair.0).to_vec();
            let second = symbols.bytes(pair.1).to_vec();

            let new_symbol = symbols.intern_merge(pair.0, pair.1)?;
            for (changed, live) in corpus.merge_pair(pair, new_symbol, &symbols)? {
                queue.push(changed, live);
            }

            assembler.push_merge(symbols.bytes(new_symbol).to_vec());
            merges.push((first, second));
            merges_done += 1;

            let current_percent = (merges_done * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "progress: {current_percent}% ({merges_done}/{num_merges} merges) \
                     - last merge: {} (frequency: {count})",
                    symbols.describe_pair(pair),
                );
                last_log_percent = current_percent;
            }
        }

        log::info!("finished training: {merges_done} merges completed");

        Ok(TrainedVocab {
            vocab: assembler.into_vocab()?,
            merges,
        })
    }
}

/// Train a byte-level BPE tokenizer from a corpus file.
///
/// Convenience entry point over [`BpeTrainer`] with `u32` ids and `u64`
/// counts, the GPT-2 word split pattern, and default special-token
/// placement.
///
/// ## Arguments
/// * `input_path` - path to a UTF-8 text file.
/// * `vocab_size` - the target vocabulary size; values at or below 256
///   produce the single-byte vocabulary with no merges.
/// * `special_tokens` - special-token strings; empty is legal, the corpus is
///   then treated as one segment.
///
/// ## Returns
/// The ``{id -> bytes}`` vocabulary and the learned merges in order.
pub fn train_bpe<P, S>(
    input_path: P,
    vocab_size: usize,
    special_tokens: &[S],
) -> PmResult<(CommonHashMap<u32, Vec<u8>>, Vec<(Vec<u8>, Vec<u8>)>)>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    let options = BpeTrainerOptions::new(vocab_size)
        .with_special_tokens(special_tokens.iter().map(|s| s.as_ref().to_string()));
    let trainer: BpeTrainer<u32, u64> = options.init();

    let trained = trainer.train_file(input_path.as_ref())?;
    Ok((trained.vocab, trained.merges))
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;
    type C = u64;

    fn byte_merges(merges: &[(Vec<u8>, Vec<u8>)]) -> Vec<(&str, &str)> {
        merges
            .iter()
            .map(|(a, b)| {
                (
                    core::str::from_utf8(a).unwrap(),
                    core::str::from_utf8(b).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_trainer_options() {
        let options = BpeTrainerOptions::new(1000);
        assert_eq!(options.vocab_size, 1000);
        assert_eq!(options.pattern, GPT2_PRETOKEN_PATTERN);
        assert!(options.special_tokens.is_empty());

        let options = options
            .with_vocab_size(2000)
            .with_pattern(r"\S+")
            .with_special_tokens(["<|endoftext|>"])
            .with_special_placement(SpecialTokenPlacement::AfterBytes)
            .with_num_chunks(4);

        assert_eq!(options.vocab_size, 2000);
        assert_eq!(options.pattern, r"\S+");
        assert_eq!(options.special_tokens, vec!["<|endoftext|>"]);
        assert_eq!(
            options.special_placement,
            SpecialTokenPlacement::AfterBytes
        );
        assert_eq!(options.num_chunks, 4);
    }

    #[test]
    fn test_vocab_size_must_fit_token_type() {
        let trainer: BpeTrainer<u8, C> = BpeTrainerOptions::new(300).init();
        let err = trainer
            .train_from_counts([(b"ab".to_vec(), 1)])
            .unwrap_err();
        assert!(matches!(err, PairmillError::VocabSizeOverflow { size: 300 }));
    }

    #[test]
    fn test_train_ababab() {
        // "ababab": (a, b) has 3 adjacencies, (b, a) has 2; each merge then
        // halves the repetition.
        let trainer: BpeTrainer<T, C> = BpeTrainerOptions::new(259).init();
        let trained = trainer
            .train_from_counts([(b"ababab".to_vec(), 1)])
            .unwrap();

        assert_eq!(
            byte_merges(&trained.merges),
            vec![("a", "b"), ("ab", "ab"), ("abab", "ab")]
        );
        assert_eq!(trained.vocab.len(), 259);
        assert_eq!(trained.vocab[&256], b"ab".to_vec());
        assert_eq!(trained.vocab[&257], b"abab".to_vec());
        assert_eq!(trained.vocab[&258], b"ababab".to_vec());
    }

    #[test]
    fn test_train_adjacent_run() {
        // "aaaa": first merge (a, a) at 3 adjacencies rewrites to (aa)(aa);
        // the only remaining pair is (aa, aa).
        let trainer: BpeTrainer<T, C> = BpeTrainerOptions::new(258).init();
        let trained = trainer.train_from_counts([(b"aaaa".to_vec(), 1)]).unwrap();

        assert_eq!(byte_merges(&trained.merges), vec![("a", "a"), ("aa", "aa")]);
    }

    #[test]
    fn test_train_halts_when_pairs_exhaust() {
        let trainer: BpeTrainer<T, C> = BpeTrainerOptions::new(1000).init();
        let trained = trainer.train_from_counts([(b"abc".to_vec(), 1)]).unwrap();

        // Only two merges are possible before the pretoken collapses.
        assert_eq!(trained.merges.len(), 2);
        assert_eq!(trained.vocab.len(), 258);
    }

    #[test]
    fn test_train_degenerate_inputs() {
        let trainer: BpeTrainer<T, C> = BpeTrainerOptions::new(300).init();
        let trained = trainer
            .train_from_counts(Vec::<(Vec<u8>, C)>::new())
            .unwrap();
        assert_eq!(trained.vocab.len(), 256);
        assert!(trained.merges.is_empty());

        // vocab_size below the byte space clamps to no merges.
        let trainer: BpeTrainer<T, C> = BpeTrainerOptions::new(100).init();
        let trained = trainer.train_from_counts([(b"abab".to_vec(), 4)]).unwrap();
        assert_eq!(trained.vocab.len(), 256);
        assert!(trained.merges.is_empty());
    }

    #[test]
    fn test_specials_consume_vocab_budget() {
        let trainer: BpeTrainer<T, C> = BpeTrainerOptions::new(258)
            .with_special_tokens(["<|endoftext|>"])
            .init();
        let trained = trainer.train_from_counts([(b"abab".to_vec(), 2)]).unwrap();

        // 256 bytes + 1 special leaves one merge.
        assert_eq!(byte_merges(&trained.merges), vec![("a", "b")]);
        assert_eq!(trained.vocab.len(), 258);
        assert_eq!(trained.vocab[&257], b"<|endoftext|>".to_vec());
    }
}
