//! Title tokenizers.
//!
//! Two distinct tokenizers live here:
//! - [`tokenize`] produces clean word tokens for n-gram extraction: every
//!   character outside `[a-z0-9 ]` is dropped and only spaces separate words.
//! - [`search_tokens`] / [`relevance_tokens`] produce search-index keys:
//!   hyphens separate words too, configured punctuation is trimmed from the
//!   ends of each word and short words are discarded.

use super::TextRules;

/// Lazy token stream over a normalized title.
///
/// Finite and restartable: [`TitleTokens::restart`] rewinds to the first
/// token, and cloning yields an independent cursor.
#[derive(Debug, Clone)]
pub struct TitleTokens<'r> {
    normalized: String,
    cursor: usize,
    stop_words: Option<&'r TextRules>,
}

impl TitleTokens<'_> {
    pub fn restart(&mut self) {
        self.cursor = 0;
    }
}

impl Iterator for TitleTokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let rest = &self.normalized[self.cursor..];
            let word = rest.trim_start_matches(' ');
            if word.is_empty() {
                self.cursor = self.normalized.len();
                return None;
            }

            let start = self.cursor + (rest.len() - word.len());
            let end = word
                .find(' ')
                .map(|offset| start + offset)
                .unwrap_or(self.normalized.len());
            self.cursor = end;

            let token = &self.normalized[start..end];
            if let Some(rules) = self.stop_words {
                if rules.is_stop_word(token) {
                    continue;
                }
            }
            return Some(token.to_string());
        }
    }
}

/// Tokenize `text` into lowercase `[a-z0-9]` words.
///
/// With `exclude_stop_words`, stop words are removed and the sequence shortens.
pub fn tokenize<'r>(text: &str, rules: &'r TextRules, exclude_stop_words: bool) -> TitleTokens<'r> {
    let normalized = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    TitleTokens {
        normalized,
        cursor: 0,
        stop_words: exclude_stop_words.then_some(rules),
    }
}

/// Search-index keys for a title.
///
/// Lowercased, hyphens treated as spaces, ends trimmed of punctuation,
/// shorter than the configured minimum dropped. Repeated words repeat.
pub fn search_tokens(text: &str, rules: &TextRules) -> Vec<String> {
    text.to_lowercase()
        .replace('-', " ")
        .split(' ')
        .map(|token| rules.trim(token))
        .filter(|token| token.chars().count() >= rules.min_search_token_len())
        .map(String::from)
        .collect()
}

/// Search-index keys with stop words removed, used to build relevance queries
/// from slugs and titles.
pub fn relevance_tokens(text: &str, rules: &TextRules) -> Vec<String> {
    text.to_lowercase()
        .replace('-', " ")
        .split(' ')
        .map(|token| rules.trim(token))
        .filter(|token| !rules.is_stop_word(token))
        .filter(|token| token.chars().count() >= rules.min_search_token_len())
        .map(String::from)
        .collect()
}

/// Raw free-text query tokens: lowercase, split on spaces, nothing else.
pub fn query_tokens(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}
