//! Score-and-sort relevance ranking over the token and n-gram indices.

use std::collections::{HashMap, HashSet};

use rand::Rng;

use super::index::{CatalogIndex, Position};
use super::sampling::sample_distinct;
use super::{RankedHit, RankedItems};
use crate::metrics;
use crate::model::{Item, ItemId};
use crate::text::{query_tokens, relevance_tokens, TextRules};

/// Per-position score accumulator shared by every ranking variant.
///
/// A position enters the candidate set on its first match, even when the
/// matching token carries zero weight.
#[derive(Debug, Default)]
struct Scoreboard {
    scores: HashMap<Position, u32>,
}

impl Scoreboard {
    fn add(&mut self, bucket: &[Position], weight: u32) {
        for pos in bucket {
            *self.scores.entry(*pos).or_insert(0) += weight;
        }
    }

    /// Sort by descending score, then by insertion order, and keep `size`.
    fn finish(self, index: &CatalogIndex, size: usize, exclude: Option<ItemId>) -> RankedItems {
        let mut ranked: Vec<(Position, u32)> = self
            .scores
            .into_iter()
            .filter(|(pos, _)| exclude != Some(index.items[*pos].id))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let total = ranked.len();
        ranked.truncate(size);

        RankedItems {
            hits: ranked
                .into_iter()
                .map(|(pos, score)| RankedHit {
                    item: index.items[pos].clone(),
                    score,
                })
                .collect(),
            total,
        }
    }
}

fn distinct(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

impl CatalogIndex {
    /// Free-text search: +1 for every query token occurrence matched by an
    /// entry in that token's bucket.
    pub(crate) fn search_by_query(&self, query: &str, size: usize) -> RankedItems {
        metrics::RANKING_QUERIES.with_label_values(&["query"]).inc();

        let mut board = Scoreboard::default();
        for token in query_tokens(query) {
            board.add(self.token_bucket(&token), 1);
        }
        board.finish(self, size, None)
    }

    /// Items sharing words with a slug; generic terms match with weight 0.
    pub(crate) fn relevant_by_search_slug(&self, slug: &str, size: usize, rules: &TextRules) -> RankedItems {
        metrics::RANKING_QUERIES.with_label_values(&["slug"]).inc();
        let tokens = distinct(relevance_tokens(slug, rules));
        self.rank_tokens(&tokens, size, Some(rules), None)
    }

    /// Items sharing words with `item`'s decoded title, `item` excluded.
    ///
    /// Every match scores 1; generic terms are not down-weighted here.
    pub(crate) fn relevant_for_item_by_title(&self, item: &Item, size: usize, rules: &TextRules) -> RankedItems {
        metrics::RANKING_QUERIES.with_label_values(&["title"]).inc();
        let tokens = distinct(relevance_tokens(&item.display_title(), rules));
        self.rank_tokens(&tokens, size, None, Some(item.id))
    }

    /// Score token buckets, weighted by `weights` when given, flat 1 otherwise.
    fn rank_tokens(
        &self,
        tokens: &[String],
        size: usize,
        weights: Option<&TextRules>,
        exclude: Option<ItemId>,
    ) -> RankedItems {
        let mut board = Scoreboard::default();
        for token in tokens {
            let weight = weights.map_or(1, |rules| rules.weight(token));
            board.add(self.token_bucket(token), weight);
        }
        board.finish(self, size, exclude)
    }

    /// Co-occurrence estimate over bounded samples of each tag and model
    /// bucket of `item`; `item` excluded.
    ///
    /// Each bucket contributes at most `size` sampled items, so the score is
    /// a statistical estimate and varies between calls on large buckets.
    pub(crate) fn relevant_for_item_by_tags_models<R: Rng + ?Sized>(
        &self,
        item: &Item,
        size: usize,
        rng: &mut R,
    ) -> RankedItems {
        metrics::RANKING_QUERIES.with_label_values(&["tags_models"]).inc();

        let mut board = Scoreboard::default();
        for tag in &item.tags {
            board.add(&sample_distinct(self.tag_bucket(tag.slug()), size, rng), 1);
        }
        for model in &item.models {
            board.add(&sample_distinct(self.model_bucket(model.slug()), size, rng), 1);
        }
        board.finish(self, size, Some(item.id))
    }

    /// Items sharing title bigrams or trigrams with `item`, `item` excluded.
    pub(crate) fn relevant_for_item_by_ngrams(&self, item: &Item, size: usize, rules: &TextRules) -> RankedItems {
        metrics::RANKING_QUERIES.with_label_values(&["ngrams"]).inc();

        let grams = item.ngrams(rules, rules.ngram_exclude_stop_words());
        let mut board = Scoreboard::default();
        for phrase in distinct(grams.bigrams) {
            board.add(self.bigram_bucket(&phrase), 1);
        }
        for phrase in distinct(grams.trigrams) {
            board.add(self.trigram_bucket(&phrase), 1);
        }
        board.finish(self, size, Some(item.id))
    }
}
