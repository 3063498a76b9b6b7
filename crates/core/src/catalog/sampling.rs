//! Bounded random selection over catalog buckets.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::index::{CatalogIndex, Position};
use super::{CatalogError, KeywordPool};
use crate::config::{RelatedConfig, SamplingConfig};
use crate::metrics;
use crate::model::{Item, Keyword};
use crate::text::TextRules;

/// Pick up to `size` distinct elements of `bucket` uniformly at random.
///
/// Repeated bucket entries count once. When `size` covers the whole bucket
/// it is returned in bucket order; otherwise a partial Fisher-Yates shuffle
/// settles `size` slots in `O(size)` swaps after an `O(len)` copy, so the
/// call terminates for every `size` no matter how the draws collide.
pub fn sample_distinct<T, R>(bucket: &[T], size: usize, rng: &mut R) -> Vec<T>
where
    T: Copy + Eq + Hash,
    R: Rng + ?Sized,
{
    let mut seen = HashSet::with_capacity(bucket.len());
    let mut pool: Vec<T> = bucket.iter().copied().filter(|v| seen.insert(*v)).collect();

    if size >= pool.len() {
        return pool;
    }

    let (picked, _) = pool.partial_shuffle(rng, size);
    picked.to_vec()
}

impl CatalogIndex {
    pub(crate) fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Position, CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        Ok(rng.gen_range(0..self.items.len()))
    }

    pub(crate) fn random_item<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Arc<Item>, CatalogError> {
        let pos = self.random_position(rng)?;
        Ok(Arc::clone(&self.items[pos]))
    }

    /// `size` independent draws; the same item may appear more than once.
    pub(crate) fn random_items<R: Rng + ?Sized>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> Result<Vec<Arc<Item>>, CatalogError> {
        (0..size).map(|_| self.random_item(rng)).collect()
    }

    pub(crate) fn sample_bucket<R: Rng + ?Sized>(
        &self,
        bucket: &[Position],
        size: usize,
        rng: &mut R,
    ) -> (Vec<Arc<Item>>, usize) {
        let picked = sample_distinct(bucket, size, rng);
        (self.resolve(&picked), bucket.len())
    }

    /// Draw `size` free-text keywords from `pool`.
    ///
    /// General draws pick a random item and one of its keywords, skipping
    /// keywordless items. The number of draws is capped at
    /// `size * keyword_draw_factor`; a capped run returns what it found, or
    /// `NoKeywords` if it found nothing.
    pub(crate) fn random_keywords<R: Rng + ?Sized>(
        &self,
        size: usize,
        pool: KeywordPool,
        sampling: &SamplingConfig,
        rng: &mut R,
    ) -> Result<Vec<Keyword>, CatalogError> {
        if size == 0 {
            return Ok(Vec::new());
        }

        if pool == KeywordPool::Seo {
            if !self.seo_pool.is_empty() {
                return Ok((0..size)
                    .filter_map(|_| self.seo_pool.choose(rng).cloned())
                    .collect());
            }
            if !sampling.seo_pool_fallback {
                return Err(CatalogError::NoKeywords);
            }
        }

        if self.items.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        if self.items_with_keywords == 0 {
            return Err(CatalogError::NoKeywords);
        }

        let budget = size.saturating_mul(sampling.keyword_draw_factor).max(size);
        let mut found = Vec::with_capacity(size);
        let mut draws = 0;

        while found.len() < size && draws < budget {
            draws += 1;
            let item = &self.items[rng.gen_range(0..self.items.len())];
            if let Some(keyword) = item.keywords.choose(rng) {
                found.push(keyword.clone());
            }
        }

        if found.len() < size {
            warn!(
                "Keyword draws exhausted after {} draws: {} of {} keywords found",
                draws,
                found.len(),
                size
            );
            metrics::KEYWORD_DRAWS_EXHAUSTED
                .with_label_values(&[pool_label(pool)])
                .inc();
            if found.is_empty() {
                return Err(CatalogError::NoKeywords);
            }
        }

        Ok(found)
    }

    /// Keywords drawn from the items most relevant to `item`'s slug.
    ///
    /// Falls back to [`CatalogIndex::random_keywords`] when fewer than
    /// `related.min_candidates` relevant items exist, or when none of them
    /// carries a keyword. Visits at most `related.max_steps` items, cycling
    /// through the relevant list.
    pub(crate) fn related_keywords<R: Rng + ?Sized>(
        &self,
        item: &Item,
        size: usize,
        pool: KeywordPool,
        rules: &TextRules,
        sampling: &SamplingConfig,
        related: &RelatedConfig,
        rng: &mut R,
    ) -> Result<Vec<Keyword>, CatalogError> {
        let relevant = self.relevant_by_search_slug(&item.slug, related.pool_size, rules);

        if relevant.hits.len() < related.min_candidates || relevant.hits.is_empty() {
            return self.random_keywords(size, pool, sampling, rng);
        }

        let mut found = Vec::with_capacity(size);
        let mut step = 0;
        while found.len() < size && step < related.max_steps {
            let candidate = &relevant.hits[step % relevant.hits.len()].item;
            if let Some(keyword) = candidate.keywords.choose(rng) {
                found.push(keyword.clone());
            }
            step += 1;
        }

        if found.is_empty() && size > 0 {
            return self.random_keywords(size, pool, sampling, rng);
        }

        Ok(found)
    }
}

fn pool_label(pool: KeywordPool) -> &'static str {
    match pool {
        KeywordPool::General => "general",
        KeywordPool::Seo => "seo",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::testing::fixtures;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_sample_distinct_exact_size() {
        let bucket: Vec<usize> = (0..50).collect();
        let mut rng = rng();
        for k in 0..=bucket.len() {
            let picked = sample_distinct(&bucket, k, &mut rng);
            assert_eq!(picked.len(), k);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), k);
            assert!(picked.iter().all(|p| bucket.contains(p)));
        }
    }

    #[test]
    fn test_sample_distinct_len_minus_one_terminates() {
        let bucket: Vec<usize> = (0..10_000).collect();
        let picked = sample_distinct(&bucket, bucket.len() - 1, &mut rng());
        assert_eq!(picked.len(), bucket.len() - 1);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), bucket.len() - 1);
    }

    #[test]
    fn test_sample_distinct_oversized_returns_bucket() {
        let bucket = vec![3usize, 1, 2];
        assert_eq!(sample_distinct(&bucket, 3, &mut rng()), bucket);
        assert_eq!(sample_distinct(&bucket, 100, &mut rng()), bucket);
        assert!(sample_distinct::<usize, _>(&[], 5, &mut rng()).is_empty());
    }

    #[test]
    fn test_sample_distinct_collapses_repeats() {
        let bucket = vec![7usize, 7, 8, 8, 9];
        let all = sample_distinct(&bucket, 10, &mut rng());
        assert_eq!(all, vec![7, 8, 9]);

        let two = sample_distinct(&bucket, 2, &mut rng());
        assert_eq!(two.len(), 2);
        assert_ne!(two[0], two[1]);
    }

    #[test]
    fn test_random_item_on_empty_index() {
        let index = CatalogIndex::default();
        assert!(matches!(
            index.random_item(&mut rng()),
            Err(CatalogError::EmptyCatalog)
        ));
        assert!(matches!(
            index.random_items(3, &mut rng()),
            Err(CatalogError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_random_items_with_replacement() {
        let rules = TextRules::default();
        let mut index = CatalogIndex::default();
        index.insert(fixtures::item(123456, "only one"), &rules);

        let items = index.random_items(5, &mut rng()).unwrap();
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|item| item.id == 123456));
    }

    #[test]
    fn test_random_keywords_fail_without_keywords() {
        let rules = TextRules::default();
        let mut index = CatalogIndex::default();
        for id in 0..5 {
            index.insert(fixtures::item(100000 + id, "no keywords here"), &rules);
        }

        let result = index.random_keywords(3, KeywordPool::General, &SamplingConfig::default(), &mut rng());
        assert!(matches!(result, Err(CatalogError::NoKeywords)));
    }

    #[test]
    fn test_random_keywords_skip_keywordless_items() {
        let rules = TextRules::default();
        let mut index = CatalogIndex::default();
        for id in 0..5 {
            index.insert(fixtures::item(100000 + id, "plain item"), &rules);
        }
        let mut rich = fixtures::item(200000, "rich item");
        rich.add_keyword(Keyword::free(1, "golden hour"));
        index.insert(rich, &rules);

        let keywords = index
            .random_keywords(4, KeywordPool::General, &SamplingConfig::default(), &mut rng())
            .unwrap();
        assert_eq!(keywords.len(), 4);
        assert!(keywords.iter().all(|k| k.phrase() == "golden hour"));
    }

    #[test]
    fn test_capped_draws_return_short_result() {
        let rules = TextRules::default();
        let mut index = CatalogIndex::default();
        for id in 0..50 {
            index.insert(fixtures::item(100000 + id, "plain item"), &rules);
        }
        let mut rich = fixtures::item(200000, "rich item");
        rich.add_keyword(Keyword::free(1, "golden hour"));
        index.insert(rich, &rules);

        let tight = SamplingConfig {
            keyword_draw_factor: 1,
            ..Default::default()
        };
        match index.random_keywords(10, KeywordPool::General, &tight, &mut rng()) {
            Ok(keywords) => {
                assert!(!keywords.is_empty());
                assert!(keywords.len() < 10);
                assert!(keywords.iter().all(|k| k.phrase() == "golden hour"));
            }
            Err(e) => assert!(matches!(e, CatalogError::NoKeywords)),
        }
    }

    #[test]
    fn test_seo_pool_preferred_then_fallback() {
        let rules = TextRules::default();
        let mut index = CatalogIndex::default();
        let mut item = fixtures::item(100001, "some item");
        item.add_keyword(Keyword::free(1, "general phrase"));
        index.insert(item, &rules);

        let fallback = SamplingConfig::default();
        let strict = SamplingConfig {
            seo_pool_fallback: false,
            ..Default::default()
        };

        let from_general = index
            .random_keywords(2, KeywordPool::Seo, &fallback, &mut rng())
            .unwrap();
        assert!(from_general.iter().all(|k| k.phrase() == "general phrase"));
        assert!(matches!(
            index.random_keywords(2, KeywordPool::Seo, &strict, &mut rng()),
            Err(CatalogError::NoKeywords)
        ));

        index.seo_pool.push(Keyword::free(9, "seo phrase"));
        let from_seo = index
            .random_keywords(3, KeywordPool::Seo, &strict, &mut rng())
            .unwrap();
        assert_eq!(from_seo.len(), 3);
        assert!(from_seo.iter().all(|k| k.phrase() == "seo phrase"));
    }

    #[test]
    fn test_related_keywords_fall_back_to_random_pool() {
        let rules = TextRules::default();
        let mut index = CatalogIndex::default();
        let mut item = fixtures::item(100001, "lonely sunset");
        item.add_keyword(Keyword::free(1, "lonely sunset"));
        let item = index.insert(item, &rules);

        let keywords = index
            .related_keywords(
                &item,
                2,
                KeywordPool::General,
                &rules,
                &SamplingConfig::default(),
                &RelatedConfig::default(),
                &mut rng(),
            )
            .unwrap();
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn test_related_keywords_from_relevant_items() {
        let rules = TextRules::default();
        let mut index = CatalogIndex::default();
        for id in 0..5 {
            let mut item = fixtures::item(100000 + id, &format!("mountain lake {id}"));
            item.add_keyword(Keyword::free(id as i64, format!("lake phrase {id}")));
            index.insert(item, &rules);
        }
        let mut other = fixtures::item(200000, "desert road");
        other.add_keyword(Keyword::free(99, "desert phrase"));
        index.insert(other, &rules);

        let target = fixtures::item(300000, "mountain lake");
        let related = RelatedConfig {
            pool_size: 10,
            min_candidates: 3,
            max_steps: 50,
        };
        let keywords = index
            .related_keywords(
                &target,
                8,
                KeywordPool::General,
                &rules,
                &SamplingConfig::default(),
                &related,
                &mut rng(),
            )
            .unwrap();
        assert_eq!(keywords.len(), 8);
        assert!(keywords.iter().all(|k| k.phrase().starts_with("lake phrase")));
    }
}
