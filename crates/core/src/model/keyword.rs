//! Vocabulary entries: tags, model names and free-text keyword phrases.

use serde::{Deserialize, Serialize};

use super::slug::{content_key, slugify};

/// Numeric identifier of a vocabulary entry.
pub type KeywordId = i64;

/// Phrase carried by the sentinel returned when an item has no keywords.
pub const NOT_FOUND_PHRASE: &str = "not-found";

/// Which vocabulary a keyword belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordKind {
    /// Controlled tag vocabulary.
    Tag,
    /// Performer/model names.
    Model,
    /// Free-text keyword phrase attached to a single item.
    FreeKeyword,
}

/// An immutable vocabulary entry.
///
/// The slug is derived once at construction and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    id: KeywordId,
    phrase: String,
    kind: KeywordKind,
    slug: String,
}

impl Keyword {
    pub fn new(id: KeywordId, phrase: impl Into<String>, kind: KeywordKind) -> Self {
        let phrase = phrase.into();
        let slug = slugify(&phrase);
        Self {
            id,
            phrase,
            kind,
            slug,
        }
    }

    pub fn tag(id: KeywordId, phrase: impl Into<String>) -> Self {
        Self::new(id, phrase, KeywordKind::Tag)
    }

    pub fn model(id: KeywordId, phrase: impl Into<String>) -> Self {
        Self::new(id, phrase, KeywordKind::Model)
    }

    pub fn free(id: KeywordId, phrase: impl Into<String>) -> Self {
        Self::new(id, phrase, KeywordKind::FreeKeyword)
    }

    /// Sentinel handed out when an item has no free-text keywords.
    pub fn not_found() -> Self {
        Self::free(0, NOT_FOUND_PHRASE)
    }

    pub fn is_not_found(&self) -> bool {
        self.id == 0 && self.phrase == NOT_FOUND_PHRASE
    }

    pub fn id(&self) -> KeywordId {
        self.id
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn kind(&self) -> KeywordKind {
        self.kind
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// md5 of the slug, used as an alias key into the catalog.
    pub fn content_key(&self) -> String {
        content_key(&self.slug)
    }
}
