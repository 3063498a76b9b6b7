//! Flat persisted forms of keywords and items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Item, ItemId, Keyword, KeywordId, KeywordKind, Origin};

/// A keyword as stored in the dictionary streams and inline in item records.
///
/// The slug is not stored; it is derived again on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub id: KeywordId,
    pub phrase: String,
    pub kind: KeywordKind,
}

impl From<&Keyword> for KeywordRecord {
    fn from(keyword: &Keyword) -> Self {
        Self {
            id: keyword.id(),
            phrase: keyword.phrase().to_string(),
            kind: keyword.kind(),
        }
    }
}

impl From<KeywordRecord> for Keyword {
    fn from(record: KeywordRecord) -> Self {
        Keyword::new(record.id, record.phrase, record.kind)
    }
}

/// An item with tags and models stored by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub title: String,
    pub origin: Origin,
    pub origin_id: String,
    pub origin_url: String,
    /// Duration in seconds.
    pub duration: u32,
    pub slug: String,
    pub source: String,
    pub description: String,
    pub modified_at: DateTime<Utc>,
    pub tag_ids: Vec<KeywordId>,
    pub model_ids: Vec<KeywordId>,
    pub keywords: Vec<KeywordRecord>,
    pub thumb_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub aliases: Vec<String>,
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            origin: item.origin,
            origin_id: item.origin_id.clone(),
            origin_url: item.origin_url.clone(),
            duration: item.duration_secs,
            slug: item.slug.clone(),
            source: item.source.clone(),
            description: item.description.clone(),
            modified_at: item.modified_at,
            tag_ids: item.tags.iter().map(|t| t.id()).collect(),
            model_ids: item.models.iter().map(|m| m.id()).collect(),
            keywords: item.keywords.iter().map(KeywordRecord::from).collect(),
            thumb_urls: item.thumb_urls.clone(),
            video_urls: item.video_urls.clone(),
            aliases: item.aliases.clone(),
        }
    }
}
