//! # Word Split Patterns

/// The GPT-2 style word split pattern.
///
/// Matches, in order: English contractions, an optional space followed by a
/// maximal run of letters, of digits, or of other non-space characters, a
/// run of whitespace not immediately preceding a non-space character, or a
/// run of whitespace.
///
/// The ``\s+(?!\S)`` alternative is a negative lookahead; compile this with
/// the `fancy_regex` engine (see
/// [`CorpusSplitter`](crate::pretokenize::CorpusSplitter)).
pub const GPT2_PRETOKEN_PATTERN: &str = concat!(
    r"'(?:[sdmt]|ll|ve|re)",
    r"| ?\p{L}+",
    r"| ?\p{N}+",
    r"| ?[^\s\p{L}\p{N}]+",
    r"|\s+(?!\S)",
    r"|\s+",
);

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> Vec<&str> {
        let re = fancy_regex::Regex::new(GPT2_PRETOKEN_PATTERN).unwrap();
        re.find_iter(text).map(|m| m.unwrap().as_str()).collect()
    }

    #[test]
    fn test_pattern_compiles() {
        assert!(fancy_regex::Regex::new(GPT2_PRETOKEN_PATTERN).is_ok());
    }

    #[test]
    fn test_word_splits() {
        assert_eq!(split("Hello world"), vec!["Hello", " world"]);
        assert_eq!(
            split("I'll see 42 cats!"),
            vec!["I", "'ll", " see", " 42", " cats", "!"]
        );
    }

    #[test]
    fn test_contractions() {
        assert_eq!(split("don't"), vec!["don", "'t"]);
        assert_eq!(split("we've they'd"), vec!["we", "'ve", " they", "'d"]);
    }

    #[test]
    fn test_whitespace_runs() {
        // Trailing run of spaces before a word is split so the last space
        // attaches to the word.
        assert_eq!(split("a  b"), vec!["a", " ", " b"]);
        assert_eq!(split("a   "), vec!["a", "   "]);
    }

    #[test]
    fn test_split_is_lossless() {
        let text = "It's  a \u{00e9}t\u{00e9} day, 12:30!\n\n  ok";
        assert_eq!(split(text).concat(), text);
    }
}
