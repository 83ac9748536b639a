//! Text processing utilities for tokenization

use std::collections::HashSet;

use crate::config::ArchiveConfig;

/// Word-based tokenizer splitting on non-alphanumeric characters with stop
/// word and minimum-length filtering.
///
/// Built once from the archive configuration and shared by the writer and the
/// search engine so both sides agree on what a token is.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
    min_token_len: usize,
}

impl Tokenizer {
    pub fn new(config: &ArchiveConfig) -> Self {
        Tokenizer {
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            min_token_len: config.min_token_len,
        }
    }

    /// Tokenize text: lowercase, split on non-alphanumeric boundaries, drop
    /// stop words and tokens shorter than the configured minimum
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .filter(|s| s.chars().count() >= self.min_token_len)
            .filter(|s| !self.stop_words.contains(*s))
            .map(|s| s.to_string())
            .collect()
    }

    /// Distinct tokens of a text
    pub fn token_set(&self, text: &str) -> HashSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}
