//! Types for the in-memory catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Item, ItemId, KeywordId, Origin};

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Tag not found: {0}")]
    TagNotFound(KeywordId),

    #[error("Model not found: {0}")]
    ModelNotFound(KeywordId),

    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("No item for content key: {0}")]
    ContentKeyNotFound(String),

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("No keywords available")]
    NoKeywords,

    /// An item references vocabulary that was never registered.
    #[error("Item {item_id} references unknown {vocabulary} id {keyword_id}")]
    IntegrityViolation {
        item_id: ItemId,
        vocabulary: &'static str,
        keyword_id: KeywordId,
    },
}

impl CatalogError {
    /// True for errors that mean the catalog data itself is corrupt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CatalogError::IntegrityViolation { .. })
    }
}

/// Keyword source for random keyword draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeywordPool {
    /// Free-text keywords of randomly drawn items.
    #[default]
    General,
    /// The dedicated SEO keyword list (see `sampling.seo_pool_fallback`).
    Seo,
}

/// One ranked item and its relevance score.
#[derive(Debug, Clone)]
pub struct RankedHit {
    pub item: Arc<Item>,
    pub score: u32,
}

/// Top-N ranking result.
#[derive(Debug, Clone, Default)]
pub struct RankedItems {
    /// Hits by descending score, earlier-registered first on ties.
    pub hits: Vec<RankedHit>,
    /// Number of distinct candidates before truncation.
    pub total: usize,
}

impl RankedItems {
    pub fn items(&self) -> impl Iterator<Item = &Arc<Item>> {
        self.hits.iter().map(|hit| &hit.item)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items().map(|item| item.id).collect()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// True when candidates were cut off by the requested size.
    pub fn is_truncated(&self) -> bool {
        self.total > self.hits.len()
    }
}

/// Catalog statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub items: usize,
    pub tags: usize,
    pub models: usize,
    pub seo_keywords: usize,
    pub tag_buckets: usize,
    pub model_buckets: usize,
    pub search_tokens: usize,
    pub bigrams: usize,
    pub trigrams: usize,
    pub content_keys: usize,
    /// Items carrying at least one free-text keyword.
    pub items_with_keywords: usize,
    pub origins: BTreeMap<Origin, usize>,
}
