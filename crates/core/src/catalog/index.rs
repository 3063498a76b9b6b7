//! Index structures guarded by the catalog lock.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use super::{CatalogError, CatalogStats};
use crate::metrics;
use crate::model::{Item, ItemId, Keyword, KeywordId, Origin};
use crate::snapshot::ItemRecord;
use crate::text::{search_tokens, TextRules};

/// Insertion position of an item; buckets store positions, not items.
pub(crate) type Position = usize;

/// Every index the catalog maintains.
///
/// Only reachable through the catalog's `RwLock`, so a reader always sees
/// an item in all indices or in none.
#[derive(Debug, Default)]
pub(crate) struct CatalogIndex {
    pub(crate) items: Vec<Arc<Item>>,
    pub(crate) by_id: HashMap<ItemId, Position>,
    pub(crate) by_tag_slug: HashMap<String, Vec<Position>>,
    pub(crate) by_model_slug: HashMap<String, Vec<Position>>,
    pub(crate) by_search_token: HashMap<String, Vec<Position>>,
    pub(crate) by_bigram: HashMap<String, Vec<Position>>,
    pub(crate) by_trigram: HashMap<String, Vec<Position>>,
    pub(crate) by_content_key: HashMap<String, Position>,
    pub(crate) dict_tags: HashMap<KeywordId, Arc<Keyword>>,
    pub(crate) dict_models: HashMap<KeywordId, Arc<Keyword>>,
    pub(crate) seo_pool: Vec<Keyword>,
    pub(crate) origin_counts: HashMap<Origin, usize>,
    pub(crate) items_with_keywords: usize,
}

impl CatalogIndex {
    /// Add `item` to the item list and fan it out to every index.
    ///
    /// Content keys and the id index are last-writer-wins.
    pub(crate) fn insert(&mut self, item: Item, rules: &TextRules) -> Arc<Item> {
        let pos = self.items.len();
        let item = Arc::new(item);

        for tag in &item.tags {
            push_bucket(&mut self.by_tag_slug, tag.slug(), pos);
        }
        for model in &item.models {
            push_bucket(&mut self.by_model_slug, model.slug(), pos);
        }

        let title = item.display_title();
        for token in search_tokens(&title, rules) {
            push_bucket(&mut self.by_search_token, &token, pos);
        }

        let grams = item.ngrams(rules, rules.ngram_exclude_stop_words());
        for phrase in &grams.bigrams {
            push_bucket(&mut self.by_bigram, phrase, pos);
        }
        for phrase in &grams.trigrams {
            push_bucket(&mut self.by_trigram, phrase, pos);
        }

        self.by_content_key.insert(item.content_key(), pos);
        for keyword in &item.keywords {
            self.by_content_key.insert(keyword.content_key(), pos);
        }

        self.by_id.insert(item.id, pos);
        *self.origin_counts.entry(item.origin).or_insert(0) += 1;
        if item.has_keywords() {
            self.items_with_keywords += 1;
        }

        self.items.push(Arc::clone(&item));
        metrics::ITEMS_REGISTERED.inc();
        debug!(
            "Registered item {} ({} tags, {} models, {} keywords)",
            item.id,
            item.tags.len(),
            item.models.len(),
            item.keywords.len()
        );

        item
    }

    /// Rebuild an item from a snapshot record, resolving tag and model ids
    /// against the vocabulary dictionaries.
    pub(crate) fn resolve_record(&self, record: ItemRecord) -> Result<Item, CatalogError> {
        let tags = record
            .tag_ids
            .iter()
            .map(|id| {
                self.dict_tags
                    .get(id)
                    .cloned()
                    .ok_or_else(|| integrity_violation(record.id, "tag", *id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let models = record
            .model_ids
            .iter()
            .map(|id| {
                self.dict_models
                    .get(id)
                    .cloned()
                    .ok_or_else(|| integrity_violation(record.id, "model", *id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Item {
            id: record.id,
            title: record.title,
            origin: record.origin,
            origin_id: record.origin_id,
            origin_url: record.origin_url,
            duration_secs: record.duration,
            slug: record.slug,
            source: record.source,
            description: record.description,
            modified_at: record.modified_at,
            tags,
            models,
            keywords: record.keywords.into_iter().map(Keyword::from).collect(),
            thumb_urls: record.thumb_urls,
            video_urls: record.video_urls,
            aliases: record.aliases,
        })
    }

    /// Build a fresh index from loaded dictionaries and records.
    ///
    /// Fails on the first record referencing unknown vocabulary; nothing
    /// partially built escapes.
    pub(crate) fn hydrate(
        tags: Vec<Keyword>,
        models: Vec<Keyword>,
        records: Vec<ItemRecord>,
        rules: &TextRules,
    ) -> Result<Self, CatalogError> {
        let mut index = Self::default();
        for tag in tags {
            index.upsert_tag(tag);
        }
        for model in models {
            index.upsert_model(model);
        }
        index.items.reserve(records.len());
        for record in records {
            let item = index.resolve_record(record)?;
            index.insert(item, rules);
        }
        Ok(index)
    }

    pub(crate) fn upsert_tag(&mut self, tag: Keyword) -> Arc<Keyword> {
        let tag = Arc::new(tag);
        self.dict_tags.insert(tag.id(), Arc::clone(&tag));
        tag
    }

    pub(crate) fn upsert_model(&mut self, model: Keyword) -> Arc<Keyword> {
        let model = Arc::new(model);
        self.dict_models.insert(model.id(), Arc::clone(&model));
        model
    }

    pub(crate) fn resolve(&self, positions: &[Position]) -> Vec<Arc<Item>> {
        positions
            .iter()
            .map(|pos| Arc::clone(&self.items[*pos]))
            .collect()
    }

    pub(crate) fn tag_bucket(&self, slug: &str) -> &[Position] {
        bucket(&self.by_tag_slug, slug)
    }

    pub(crate) fn model_bucket(&self, slug: &str) -> &[Position] {
        bucket(&self.by_model_slug, slug)
    }

    pub(crate) fn token_bucket(&self, token: &str) -> &[Position] {
        bucket(&self.by_search_token, token)
    }

    pub(crate) fn bigram_bucket(&self, phrase: &str) -> &[Position] {
        bucket(&self.by_bigram, phrase)
    }

    pub(crate) fn trigram_bucket(&self, phrase: &str) -> &[Position] {
        bucket(&self.by_trigram, phrase)
    }

    pub(crate) fn get_by_content_key(&self, key: &str) -> Result<Arc<Item>, CatalogError> {
        self.by_content_key
            .get(key)
            .map(|pos| Arc::clone(&self.items[*pos]))
            .ok_or_else(|| CatalogError::ContentKeyNotFound(key.to_string()))
    }

    pub(crate) fn get_item(&self, id: ItemId) -> Result<Arc<Item>, CatalogError> {
        self.by_id
            .get(&id)
            .map(|pos| Arc::clone(&self.items[*pos]))
            .ok_or(CatalogError::ItemNotFound(id))
    }

    pub(crate) fn get_tag(&self, id: KeywordId) -> Result<Arc<Keyword>, CatalogError> {
        self.dict_tags
            .get(&id)
            .cloned()
            .ok_or(CatalogError::TagNotFound(id))
    }

    pub(crate) fn get_model(&self, id: KeywordId) -> Result<Arc<Keyword>, CatalogError> {
        self.dict_models
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ModelNotFound(id))
    }

    pub(crate) fn stats(&self) -> CatalogStats {
        CatalogStats {
            items: self.items.len(),
            tags: self.dict_tags.len(),
            models: self.dict_models.len(),
            seo_keywords: self.seo_pool.len(),
            tag_buckets: self.by_tag_slug.len(),
            model_buckets: self.by_model_slug.len(),
            search_tokens: self.by_search_token.len(),
            bigrams: self.by_bigram.len(),
            trigrams: self.by_trigram.len(),
            content_keys: self.by_content_key.len(),
            items_with_keywords: self.items_with_keywords,
            origins: self.origin_counts.iter().map(|(o, c)| (*o, *c)).collect(),
        }
    }
}

fn push_bucket(map: &mut HashMap<String, Vec<Position>>, key: &str, pos: Position) {
    match map.get_mut(key) {
        Some(bucket) => bucket.push(pos),
        None => {
            map.insert(key.to_string(), vec![pos]);
        }
    }
}

fn bucket<'a>(map: &'a HashMap<String, Vec<Position>>, key: &str) -> &'a [Position] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}

fn integrity_violation(item_id: ItemId, vocabulary: &'static str, keyword_id: KeywordId) -> CatalogError {
    error!(
        "Item {} references unknown {} id {}; snapshot is corrupt or loaded out of order",
        item_id, vocabulary, keyword_id
    );
    CatalogError::IntegrityViolation {
        item_id,
        vocabulary,
        keyword_id,
    }
}
