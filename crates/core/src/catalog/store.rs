//! Thread-safe catalog facade.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};
use rand::Rng;
use tracing::debug;

use super::index::CatalogIndex;
use super::{CatalogError, CatalogStats, KeywordPool, RankedItems};
use crate::config::{CatalogConfig, RelatedConfig, SamplingConfig};
use crate::model::{Item, ItemId, Keyword, KeywordId, Origin};
use crate::snapshot::ItemRecord;
use crate::text::TextRules;

/// In-memory video catalog.
///
/// Every public method takes the lock exactly once. Registrations hold it
/// exclusively; lookups, ranking and sampling share it. Index helpers run
/// under the caller's guard and never lock again.
pub struct Catalog {
    inner: RwLock<CatalogIndex>,
    rules: TextRules,
    sampling: SamplingConfig,
    related: RelatedConfig,
    thumbs_base_url: String,
}

impl Catalog {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: RwLock::new(CatalogIndex::default()),
            rules: TextRules::from_config(&config.text),
            sampling: config.sampling.clone(),
            related: config.related.clone(),
            thumbs_base_url: config.thumbs.base_url.clone(),
        }
    }

    pub fn rules(&self) -> &TextRules {
        &self.rules
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, CatalogIndex> {
        self.inner.write()
    }

    // ----- Registration -----

    /// Insert `item` into every index.
    pub fn register(&self, item: Item) -> Arc<Item> {
        self.inner.write().insert(item, &self.rules)
    }

    /// Rebuild an item from a snapshot record and register it.
    ///
    /// Fails with [`CatalogError::IntegrityViolation`] when the record
    /// references a tag or model that is not registered; nothing is
    /// inserted in that case.
    pub fn register_record(&self, record: ItemRecord) -> Result<Arc<Item>, CatalogError> {
        let mut index = self.inner.write();
        let item = index.resolve_record(record)?;
        Ok(index.insert(item, &self.rules))
    }

    /// Upsert a tag by id; the last write for an id wins.
    pub fn register_tag(&self, tag: Keyword) -> Arc<Keyword> {
        debug!("Registering tag {} ({})", tag.id(), tag.phrase());
        self.inner.write().upsert_tag(tag)
    }

    /// Upsert a model by id; the last write for an id wins.
    pub fn register_model(&self, model: Keyword) -> Arc<Keyword> {
        debug!("Registering model {} ({})", model.id(), model.phrase());
        self.inner.write().upsert_model(model)
    }

    pub fn register_seo_keyword(&self, keyword: Keyword) {
        self.inner.write().seo_pool.push(keyword);
    }

    // ----- Lookups -----

    /// Item whose own slug, or one of whose keyword slugs, hashes to `key`.
    pub fn get_by_content_key(&self, key: &str) -> Result<Arc<Item>, CatalogError> {
        self.inner.read().get_by_content_key(key)
    }

    /// Content-key lookup from an unhashed slug.
    pub fn get_by_slug(&self, slug: &str) -> Result<Arc<Item>, CatalogError> {
        self.get_by_content_key(&crate::model::content_key(slug))
    }

    pub fn get_item(&self, id: ItemId) -> Result<Arc<Item>, CatalogError> {
        self.inner.read().get_item(id)
    }

    pub fn get_tag(&self, id: KeywordId) -> Result<Arc<Keyword>, CatalogError> {
        self.inner.read().get_tag(id)
    }

    pub fn get_model(&self, id: KeywordId) -> Result<Arc<Keyword>, CatalogError> {
        self.inner.read().get_model(id)
    }

    pub fn items_by_tag(&self, slug: &str) -> Vec<Arc<Item>> {
        let index = self.inner.read();
        index.resolve(index.tag_bucket(slug))
    }

    pub fn items_by_model(&self, slug: &str) -> Vec<Arc<Item>> {
        let index = self.inner.read();
        index.resolve(index.model_bucket(slug))
    }

    pub fn items_by_bigram(&self, phrase: &str) -> Vec<Arc<Item>> {
        let index = self.inner.read();
        index.resolve(index.bigram_bucket(phrase))
    }

    pub fn items_by_trigram(&self, phrase: &str) -> Vec<Arc<Item>> {
        let index = self.inner.read();
        index.resolve(index.trigram_bucket(phrase))
    }

    /// Items in insertion order, `limit` at most, starting at `offset`.
    pub fn items_range(&self, offset: usize, limit: usize) -> Vec<Arc<Item>> {
        self.inner
            .read()
            .items
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    // ----- Ranking -----

    pub fn search_by_query(&self, query: &str, size: usize) -> RankedItems {
        self.inner.read().search_by_query(query, size)
    }

    pub fn relevant_by_search_slug(&self, slug: &str, size: usize) -> RankedItems {
        self.inner
            .read()
            .relevant_by_search_slug(slug, size, &self.rules)
    }

    pub fn relevant_for_item_by_title(&self, item: &Item, size: usize) -> RankedItems {
        self.inner
            .read()
            .relevant_for_item_by_title(item, size, &self.rules)
    }

    pub fn relevant_for_item_by_tags_models(&self, item: &Item, size: usize) -> RankedItems {
        self.relevant_for_item_by_tags_models_with_rng(item, size, &mut rand::thread_rng())
    }

    pub fn relevant_for_item_by_tags_models_with_rng<R: Rng + ?Sized>(
        &self,
        item: &Item,
        size: usize,
        rng: &mut R,
    ) -> RankedItems {
        self.inner
            .read()
            .relevant_for_item_by_tags_models(item, size, rng)
    }

    pub fn relevant_for_item_by_ngrams(&self, item: &Item, size: usize) -> RankedItems {
        self.inner
            .read()
            .relevant_for_item_by_ngrams(item, size, &self.rules)
    }

    // ----- Sampling -----

    pub fn random_item(&self) -> Result<Arc<Item>, CatalogError> {
        self.random_item_with_rng(&mut rand::thread_rng())
    }

    pub fn random_item_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Arc<Item>, CatalogError> {
        self.inner.read().random_item(rng)
    }

    /// `size` independent draws, duplicates allowed.
    pub fn random_items(&self, size: usize) -> Result<Vec<Arc<Item>>, CatalogError> {
        self.random_items_with_rng(size, &mut rand::thread_rng())
    }

    pub fn random_items_with_rng<R: Rng + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<Arc<Item>>, CatalogError> {
        self.inner.read().random_items(size, rng)
    }

    /// Up to `size` distinct items carrying tag `slug`, plus the bucket length.
    ///
    /// The bucket length counts repeated entries (an item tagged twice is
    /// listed twice), so it can exceed the number of items returned even
    /// when `size` covers the whole bucket.
    pub fn random_set_by_tag(&self, slug: &str, size: usize) -> (Vec<Arc<Item>>, usize) {
        self.random_set_by_tag_with_rng(slug, size, &mut rand::thread_rng())
    }

    pub fn random_set_by_tag_with_rng<R: Rng + ?Sized>(
        &self,
        slug: &str,
        size: usize,
        rng: &mut R,
    ) -> (Vec<Arc<Item>>, usize) {
        let index = self.inner.read();
        index.sample_bucket(index.tag_bucket(slug), size, rng)
    }

    /// Up to `size` distinct items featuring model `slug`, plus the bucket
    /// length (repeated entries included, see [`Catalog::random_set_by_tag`]).
    pub fn random_set_by_model(&self, slug: &str, size: usize) -> (Vec<Arc<Item>>, usize) {
        self.random_set_by_model_with_rng(slug, size, &mut rand::thread_rng())
    }

    pub fn random_set_by_model_with_rng<R: Rng + ?Sized>(
        &self,
        slug: &str,
        size: usize,
        rng: &mut R,
    ) -> (Vec<Arc<Item>>, usize) {
        let index = self.inner.read();
        index.sample_bucket(index.model_bucket(slug), size, rng)
    }

    /// Draw up to `size` free-text keywords from `pool`.
    ///
    /// Draws are capped at `size * sampling.keyword_draw_factor`. A capped run
    /// that found at least one keyword returns `Ok` with fewer than `size`
    /// entries; callers must not assume a full result. A run that found none
    /// fails with [`CatalogError::NoKeywords`].
    pub fn random_keywords(&self, size: usize, pool: KeywordPool) -> Result<Vec<Keyword>, CatalogError> {
        self.random_keywords_with_rng(size, pool, &mut rand::thread_rng())
    }

    pub fn random_keywords_with_rng<R: Rng + ?Sized>(
        &self,
        size: usize,
        pool: KeywordPool,
        rng: &mut R,
    ) -> Result<Vec<Keyword>, CatalogError> {
        self.inner
            .read()
            .random_keywords(size, pool, &self.sampling, rng)
    }

    pub fn related_keywords(
        &self,
        item: &Item,
        size: usize,
        pool: KeywordPool,
    ) -> Result<Vec<Keyword>, CatalogError> {
        self.related_keywords_with_rng(item, size, pool, &mut rand::thread_rng())
    }

    pub fn related_keywords_with_rng<R: Rng + ?Sized>(
        &self,
        item: &Item,
        size: usize,
        pool: KeywordPool,
        rng: &mut R,
    ) -> Result<Vec<Keyword>, CatalogError> {
        self.inner.read().related_keywords(
            item,
            size,
            pool,
            &self.rules,
            &self.sampling,
            &self.related,
            rng,
        )
    }

    // ----- Misc -----

    /// Poster thumbnail URL under the configured base URL.
    pub fn thumb_url(&self, item: &Item) -> String {
        item.thumb_url(&self.thumbs_base_url)
    }

    pub fn origin_counts(&self) -> HashMap<Origin, usize> {
        self.inner.read().origin_counts.clone()
    }

    pub fn stats(&self) -> CatalogStats {
        self.inner.read().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&CatalogConfig::default())
    }
}
