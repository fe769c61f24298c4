use crate::config::TokenizerConfig;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref DEFAULT: Tokenizer = Tokenizer { config: TokenizerConfig::default() };
}

/// Splits text into lowercase words and emits their contiguous n-grams as terms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TokenizerConfig { &self.config }

    /// Lowercased words split on non-alphanumeric boundaries.
    pub fn words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        WORD.find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|w| w.chars().count() >= self.config.min_token_len)
            .map(str::to_owned)
            .collect()
    }

    /// All n-grams for n in `min_ngram..=max_ngram`, grouped by n, each group in text order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let words = self.words(text);
        let mut terms = Vec::new();
        for n in self.config.min_ngram..=self.config.max_ngram {
            if n > words.len() { break; }
            terms.extend(words.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

/// Tokenize with the default unigram-to-trigram configuration.
pub fn tokenize(text: &str) -> Vec<String> {
    DEFAULT.tokenize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("a b c");
        assert_eq!(t, vec!["a", "b", "c", "a b", "b c", "a b c"]);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ,.;  ").is_empty());
    }

    #[test]
    fn min_token_len_drops_short_words() {
        let tok = Tokenizer::new(TokenizerConfig { min_token_len: 2, ..Default::default() }).unwrap();
        assert_eq!(tok.words("a cat, a hat"), vec!["cat", "hat"]);
        assert!(tok.tokenize("a cat, a hat").contains(&"cat hat".to_string()));
    }
}
