use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

/// Controls how text is split into terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    /// Smallest n-gram emitted.
    pub min_ngram: usize,
    /// Largest n-gram emitted.
    pub max_ngram: usize,
    /// Words shorter than this many characters are dropped before n-grams are formed.
    pub min_token_len: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self { min_ngram: 1, max_ngram: 3, min_token_len: 1 }
    }
}

impl TokenizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_ngram == 0 {
            return Err(SearchError::InvalidConfig("min_ngram must be at least 1".into()));
        }
        if self.max_ngram < self.min_ngram {
            return Err(SearchError::InvalidConfig(format!(
                "max_ngram ({}) is smaller than min_ngram ({})",
                self.max_ngram, self.min_ngram
            )));
        }
        if self.min_token_len == 0 {
            return Err(SearchError::InvalidConfig("min_token_len must be at least 1".into()));
        }
        Ok(())
    }
}
