use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub thumbs: ThumbsConfig,
    #[serde(default)]
    pub text: TextConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub related: RelatedConfig,
}

/// Snapshot storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the `tags`, `models` and `videos` streams.
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("data")
}

/// Thumbnail URL configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ThumbsConfig {
    /// Base URL prepended to derived thumbnail paths (e.g. "https://cdn.example.com/pics").
    #[serde(default)]
    pub base_url: String,
}

/// Static vocabulary tables consumed by the tokenizers and ranking.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TextConfig {
    /// Words dropped from token streams when stop-word filtering is on.
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
    /// Characters trimmed from both ends of search tokens.
    #[serde(default = "default_trim_symbols")]
    pub trim_symbols: String,
    /// Generic site-wide terms that match but add nothing to a relevance score.
    #[serde(default = "default_zero_weight_tokens")]
    pub zero_weight_tokens: Vec<String>,
    /// Shortest token (in characters) kept in the search index.
    #[serde(default = "default_min_search_token_len")]
    pub min_search_token_len: usize,
    /// Build the n-gram indices from stop-word filtered titles.
    #[serde(default = "default_true")]
    pub ngram_exclude_stop_words: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
            trim_symbols: default_trim_symbols(),
            zero_weight_tokens: default_zero_weight_tokens(),
            min_search_token_len: default_min_search_token_len(),
            ngram_exclude_stop_words: true,
        }
    }
}

fn default_stop_words() -> Vec<String> {
    [
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have",
        "he", "her", "his", "i", "in", "is", "it", "its", "me", "my", "no", "not", "of", "on",
        "or", "she", "so", "that", "the", "their", "them", "they", "this", "to", "was", "we",
        "were", "will", "with", "you", "your",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_trim_symbols() -> String {
    " .,:;!?'\"`()[]{}<>|/\\#*&^%$@~+=_".to_string()
}

fn default_zero_weight_tokens() -> Vec<String> {
    ["video", "porn", "sex", "fuck", "xxx", "xnxx"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_min_search_token_len() -> usize {
    3
}

fn default_true() -> bool {
    true
}

/// Random sampling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SamplingConfig {
    /// Draw budget per requested keyword before a keyword draw gives up.
    #[serde(default = "default_keyword_draw_factor")]
    pub keyword_draw_factor: usize,
    /// Draw from the general pool when the dedicated SEO pool is empty.
    #[serde(default = "default_true")]
    pub seo_pool_fallback: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            keyword_draw_factor: default_keyword_draw_factor(),
            seo_pool_fallback: true,
        }
    }
}

fn default_keyword_draw_factor() -> usize {
    50
}

/// Related keyword set configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelatedConfig {
    /// How many relevant items are considered as keyword sources.
    #[serde(default = "default_related_pool_size")]
    pub pool_size: usize,
    /// Below this many relevant items the random pool is used instead.
    #[serde(default = "default_related_min_candidates")]
    pub min_candidates: usize,
    /// Upper bound on items visited while collecting keywords.
    #[serde(default = "default_related_max_steps")]
    pub max_steps: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            pool_size: default_related_pool_size(),
            min_candidates: default_related_min_candidates(),
            max_steps: default_related_max_steps(),
        }
    }
}

fn default_related_pool_size() -> usize {
    300
}

fn default_related_min_candidates() -> usize {
    20
}

fn default_related_max_steps() -> usize {
    1000
}
