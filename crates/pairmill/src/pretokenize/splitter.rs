//! # Corpus Splitter

use crate::PmResult;

/// The two regexes that cut corpus text into pretokens.
///
/// They deliberately ride different engines: the word split pattern needs
/// the `\s+(?!\S)` negative lookahead only `fancy_regex` provides, while the
/// special-token cut is a union of escaped literals the plain `regex` engine
/// runs faster.
///
/// Special tokens are hard cut points: the text is first split at every
/// exact occurrence of a special token (the occurrences themselves are
/// discarded), and the word pattern runs within each segment. A special
/// token therefore never appears inside a pretoken.
#[derive(Debug, Clone)]
pub struct CorpusSplitter {
    word_re: fancy_regex::Regex,
    special_re: Option<regex::Regex>,
}

impl CorpusSplitter {
    /// Compile a splitter.
    ///
    /// ## Arguments
    /// * `word_pattern` - the word split pattern.
    /// * `specials` - the special-token strings; empty is legal, the text is
    ///   then one segment.
    ///
    /// ## Returns
    /// A new `CorpusSplitter`, or the compilation error of whichever regex
    /// failed.
    pub fn new<S: AsRef<str>>(
        word_pattern: &str,
        specials: &[S],
    ) -> PmResult<Self> {
        let word_re = fancy_regex::Regex::new(word_pattern)?;

        let special_re = if specials.is_empty() {
            None
        } else {
            let union = specials
                .iter()
                .map(|s| regex::escape(s.as_ref()))
                .collect::<Vec<_>>()
                .join("|");
            Some(regex::Regex::new(&format!("({union})"))?)
        };

        Ok(Self {
            word_re,
            special_re,
        })
    }

    /// The word split pattern.
    pub fn word_pattern(&self) -> &str {
        self.word_re.as_str()
    }

    /// Call `f` on every segment between special-token cuts, in order.
    ///
    /// Cut occurrences are discarded; segments may be empty (adjacent cuts,
    /// or a cut at either end of the text).
    ///
    /// ## Arguments
    /// * `text` - the text to cut.
    /// * `f` - the function to apply to each segment.
    pub fn for_each_segment<F>(
        &self,
        text: &str,
        f: &mut F,
    ) where
        F: FnMut(&str),
    {
        match &self.special_re {
            None => f(text),
            Some(re) => {
                let mut last = 0;
                for m in re.find_iter(text) {
                    f(&text[last..m.start()]);
                    last = m.end();
                }
                f(&text[last..]);
            }
        }
    }

    /// Iterate over the word matches of one segment.
    ///
    /// ## Arguments
    /// * `segment` - a segment produced by [`Self::for_each_segment`].
    pub fn words<'h>(
        &self,
        segment: &'h str,
    ) -> impl Iterator<Item = &'h str> {
        self.word_re
            .find_iter(segment)
            .map(|m| m.expect("word regex search failed").as_str())
    }
}
