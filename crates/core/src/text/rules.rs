use std::collections::HashSet;

use crate::config::TextConfig;

/// Compiled form of the text vocabulary tables.
#[derive(Debug, Clone)]
pub struct TextRules {
    stop_words: HashSet<String>,
    trim_symbols: Vec<char>,
    zero_weight_tokens: HashSet<String>,
    min_search_token_len: usize,
    ngram_exclude_stop_words: bool,
}

impl TextRules {
    pub fn from_config(config: &TextConfig) -> Self {
        Self {
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            trim_symbols: config.trim_symbols.chars().collect(),
            zero_weight_tokens: config
                .zero_weight_tokens
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
            min_search_token_len: config.min_search_token_len,
            ngram_exclude_stop_words: config.ngram_exclude_stop_words,
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Strip configured punctuation from both ends of a token.
    pub fn trim<'a>(&self, token: &'a str) -> &'a str {
        token.trim_matches(|c: char| self.trim_symbols.contains(&c))
    }

    /// Relevance contribution of one matching token: 0 for generic terms, else 1.
    pub fn weight(&self, token: &str) -> u32 {
        if self.zero_weight_tokens.contains(token) {
            0
        } else {
            1
        }
    }

    pub fn min_search_token_len(&self) -> usize {
        self.min_search_token_len
    }

    pub fn ngram_exclude_stop_words(&self) -> bool {
        self.ngram_exclude_stop_words
    }
}

impl Default for TextRules {
    fn default() -> Self {
        Self::from_config(&TextConfig::default())
    }
}
