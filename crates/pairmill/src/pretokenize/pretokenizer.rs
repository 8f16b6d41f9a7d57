//! # Parallel Pretokenizer

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use rayon::prelude::*;

use crate::PmResult;
use crate::pretokenize::chunking::find_chunk_boundaries;
use crate::pretokenize::counter::PretokenCounter;
use crate::pretokenize::patterns::GPT2_PRETOKEN_PATTERN;
use crate::pretokenize::splitter::CorpusSplitter;
use crate::types::{CommonHashMap, CountType, StringChunkType};

/// Options for [`Pretokenizer`].
#[derive(Debug, Clone)]
pub struct PretokenizerOptions {
    /// The word split pattern.
    pub pattern: String,

    /// Parallelism hint: the number of corpus chunks to aim for.
    pub num_chunks: usize,
}

impl Default for PretokenizerOptions {
    fn default() -> Self {
        Self {
            pattern: GPT2_PRETOKEN_PATTERN.to_string(),
            num_chunks: rayon::current_num_threads().max(1),
        }
    }
}

impl PretokenizerOptions {
    /// Sets the word split pattern.
    pub fn with_pattern<S: Into<String>>(
        self,
        pattern: S,
    ) -> Self {
        Self {
            pattern: pattern.into(),
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
}

/// File-level pretokenization driver.
///
/// Memory-maps the corpus read-only, splits it into chunks whose edges fall
/// on special-token cuts, counts each chunk on the rayon pool with a local
/// [`PretokenCounter`], and sums the per-worker tables. Because every chunk
/// edge is a cut the [`CorpusSplitter`] would also make, the parallel result
/// is byte-identical to a single-chunk run.
pub struct Pretokenizer {
    splitter: CorpusSplitter,
    split_token: Option<Vec<u8>>,
    num_chunks: usize,
}

impl Pretokenizer {
    /// Create a new pretokenizer.
    ///
    /// ## Arguments
    /// * `options` - the pretokenizer options.
    /// * `specials` - the special-token strings; empty is legal, the corpus
    ///   is then treated as one segment (and one chunk).
    ///
    /// ## Returns
    /// A new `Pretokenizer`, or a pattern compilation error.
    pub fn new<S: AsRef<str>>(
        options: PretokenizerOptions,
        specials: &[S],
    ) -> PmResult<Self> {
        let splitter = CorpusSplitter::new(&options.pattern, specials)?;
        // Chunk edges must fall on cuts the splitter would make anyway.
        let split_token = specials.first().map(|s| s.as_ref().as_bytes().to_vec());

        Ok(Self {
            splitter,
            split_token,
            num_chunks: options.num_chunks.max(1),
        })
    }

    /// Count pretokens in an in-memory text.
    ///
    /// ## Arguments
    /// * `text` - the text to pretokenize.
    ///
    /// ## Returns
    /// The ``{pretoken -> count}`` table.
    pub fn count_text<K, C>(
        &self,
        text: &str,
    ) -> CommonHashMap<K, C>
    where
        K: StringChunkType,
        C: CountType,
    {
        let mut counter: PretokenCounter<K, C> = PretokenCounter::new(self.splitter.clone());
        counter.update_from_text(text);
        counter.release()
    }

    /// Count pretokens in a corpus file.
    ///
    /// Invalid UTF-8 is replaced, not surfaced; I/O errors are returned to
    /// the caller.
    ///
    /// ## Arguments
    /// * `path` - the corpus file path.
    ///
    /// ## Returns
    /// The reduced ``{pretoken -> count}`` table; empty for an empty or
    /// all-special corpus.
    pub fn count_file<K, C>(
        &self,
        path: &Path,
    ) -> PmResult<CommonHashMap<K, C>>
    where
        K: StringChunkType,
        C: CountType,
    {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(CommonHashMap::default());
        }
        let mmap = unsafe { Mmap::map(&file)? };
        let data = &mmap[..];

        let boundaries = match &self.split_token {
            Some(token) => find_chunk_boundaries(data, self.num_chunks, token),
            None => vec![0, data.len()],
        };
        let ranges: Vec<(usize, usize)> =
            boundaries.windows(2).map(|w| (w[0], w[1])).collect();

        log::info!(
            "pretokenizing {} bytes in {} chunks",
            data.len(),
            ranges.len()
        );

        let counts = ranges
            .into_par_iter()
            .map(|(start, end)| {
                let chunk = String::from_utf8_lossy(&data[start..end]);
                let mut counter: PretokenCounter<K, C> =
                    PretokenCounter::new(self.splitter.clone());
                counter.update_from_text(chunk);
                counter.release()
            })
            .reduce(CommonHashMap::default, |mut left, right| {
                for (key, count) in right {
                    *left.entry(key).or_default() += count;
                }
                left
            });

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;
    use std::io::Write;
    use tempdir::TempDir;

    type K = CompactString;
    type C = u64;

    fn write_corpus(
        dir: &TempDir,
        name: &str,
        text: &str,
    ) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_count_file_matches_count_text() {
        let dir = TempDir::new("pretokenizer").unwrap();

        let mut text = String::new();
        for i in 0..200 {
            text.push_str(&format!("doc {i} says hello world<|endoftext|>"));
        }
        let path = write_corpus(&dir, "corpus.txt", &text);

        let specials = ["<|endoftext|>".to_string()];
        let parallel =
            Pretokenizer::new(PretokenizerOptions::default().with_num_chunks(8), &specials)
                .unwrap();
        let serial =
            Pretokenizer::new(PretokenizerOptions::default().with_num_chunks(1), &specials)
                .unwrap();

        let from_text: CommonHashMap<K, C> = serial.count_text(&text);
        let from_file: CommonHashMap<K, C> = parallel.count_file(&path).unwrap();
        let from_file_serial: CommonHashMap<K, C> = serial.count_file(&path).unwrap();

        assert_eq!(from_file, from_text);
        assert_eq!(from_file, from_file_serial);
        assert_eq!(from_file.get(" world").copied(), Some(200));
    }

    #[test]
    fn test_count_empty_file() {
        let dir = TempDir::new("pretokenizer").unwrap();
        let path = write_corpus(&dir, "empty.txt", "");

        let pretokenizer =
            Pretokenizer::new(PretokenizerOptions::default(), &[] as &[&str]).unwrap();
        let counts: CommonHashMap<K, C> = pretokenizer.count_file(&path).unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let pretokenizer =
            Pretokenizer::new(PretokenizerOptions::default(), &[] as &[&str]).unwrap();
        let result = pretokenizer.count_file::<K, C>(Path::new("/no/such/corpus.txt"));
        assert!(result.is_err());
    }
}
