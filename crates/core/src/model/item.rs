//! Video records held by the catalog.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::keyword::Keyword;
use super::origin::Origin;
use super::slug::{content_key, slugify_title};
use crate::text::{ngrams, tokenize, unescape_html, NGrams, TextRules, TitleTokens};

/// Numeric identifier of an item.
pub type ItemId = u64;

/// A video record.
///
/// Tags and models are shared with the catalog's vocabulary dictionaries;
/// free-text keywords are owned copies. Once registered, an item is only
/// reachable through `Arc<Item>` and is never modified again.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub id: ItemId,
    /// Title as scraped, possibly containing HTML entities.
    pub title: String,
    pub origin: Origin,
    pub origin_id: String,
    pub origin_url: String,
    pub duration_secs: u32,
    /// Canonical slug; its md5 is the item's primary content key.
    pub slug: String,
    pub source: String,
    pub description: String,
    pub modified_at: DateTime<Utc>,
    pub tags: Vec<Arc<Keyword>>,
    pub models: Vec<Arc<Keyword>>,
    pub keywords: Vec<Keyword>,
    pub thumb_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub aliases: Vec<String>,
}

impl Item {
    /// Create an item with identity fields set and everything else empty.
    pub fn new(id: ItemId, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            slug: slug.into(),
            ..Default::default()
        }
    }

    pub fn add_tag(&mut self, tag: Arc<Keyword>) {
        self.tags.push(tag);
    }

    pub fn add_model(&mut self, model: Arc<Keyword>) {
        self.models.push(model);
    }

    pub fn add_keyword(&mut self, keyword: Keyword) {
        self.keywords.push(keyword);
    }

    /// Title with HTML entities decoded.
    pub fn display_title(&self) -> Cow<'_, str> {
        unescape_html(&self.title)
    }

    /// Slug derived from the title (may differ from the stored `slug`).
    pub fn slug_from_title(&self) -> String {
        slugify_title(&self.title)
    }

    /// md5 of the stored slug.
    pub fn content_key(&self) -> String {
        content_key(&self.slug)
    }

    /// Tag phrases followed by model phrases, comma separated.
    pub fn meta_keywords(&self) -> String {
        self.tags
            .iter()
            .chain(self.models.iter())
            .map(|k| k.phrase())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Duration as `HH:MM:SS`.
    pub fn duration_human(&self) -> String {
        let seconds = self.duration_secs % 60;
        let minutes = (self.duration_secs / 60) % 60;
        let hours = self.duration_secs / 3600;
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }

    /// Thumbnail shard directories: first and second digit pairs of the id.
    ///
    /// Ids shorter than six digits are zero-padded on the left first,
    /// so `42` shards as `00/00`.
    pub fn subdirs(&self) -> String {
        let name = format!("{:06}", self.id);
        format!("{}/{}", &name[0..2], &name[2..4])
    }

    /// Poster thumbnail path relative to the thumbnail base URL.
    pub fn poster_thumb_path(&self) -> String {
        format!("{}/{}_0.webp", self.subdirs(), self.id)
    }

    /// Absolute poster thumbnail URL under `base_url`.
    pub fn thumb_url(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.poster_thumb_path()
        )
    }

    /// One free-text keyword chosen uniformly, or [`Keyword::not_found`].
    pub fn random_keyword<R: Rng + ?Sized>(&self, rng: &mut R) -> Keyword {
        self.keywords
            .choose(rng)
            .cloned()
            .unwrap_or_else(Keyword::not_found)
    }

    pub fn keyword_by_slug(&self, slug: &str) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.slug() == slug)
    }

    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// Word tokens of the decoded title.
    pub fn title_tokens<'r>(&self, rules: &'r TextRules, exclude_stop_words: bool) -> TitleTokens<'r> {
        tokenize(&self.display_title(), rules, exclude_stop_words)
    }

    /// Bigrams and trigrams of the decoded title.
    pub fn ngrams(&self, rules: &TextRules, exclude_stop_words: bool) -> NGrams {
        let tokens: Vec<String> = self.title_tokens(rules, exclude_stop_words).collect();
        ngrams(&tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item_with_keywords(id: ItemId, phrases: &[&str]) -> Item {
        let mut item = Item::new(id, format!("title number {id}"), format!("title-number-{id}"));
        for (i, phrase) in phrases.iter().enumerate() {
            item.add_keyword(Keyword::free(i as i64 + 1, *phrase));
        }
        item
    }

    #[test]
    fn test_thumb_url() {
        let expected = [
            "https://cdn.domain.com/pics/12/34/123456_0.webp",
            "https://cdn.domain.com/pics/12/34/123457_0.webp",
            "https://cdn.domain.com/pics/12/34/123461_0.webp",
        ];
        for (id, want) in [123456, 123457, 123461].into_iter().zip(expected) {
            let item = Item::new(id, "t", "t");
            assert_eq!(item.thumb_url("https://cdn.domain.com/pics"), want);
            assert_eq!(item.thumb_url("https://cdn.domain.com/pics/"), want);
        }
    }

    #[test]
    fn test_short_id_is_zero_padded() {
        let item = Item::new(42, "t", "t");
        assert_eq!(item.subdirs(), "00/00");
        assert_eq!(item.poster_thumb_path(), "00/00/42_0.webp");

        let item = Item::new(9876543, "t", "t");
        assert_eq!(item.poster_thumb_path(), "98/76/9876543_0.webp");
    }

    #[test]
    fn test_slug_from_title() {
        let item = Item::new(1, "TiTlE with a stop word number #6 no keywords", "x");
        assert_eq!(
            item.slug_from_title(),
            "title-with-a-stop-word-number-6-no-keywords"
        );
    }

    #[test]
    fn test_random_keyword_sentinel_when_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let item = item_with_keywords(4, &[]);
        assert!(item.random_keyword(&mut rng).is_not_found());
    }

    #[test]
    fn test_random_keyword_is_owned_by_item() {
        let mut rng = StdRng::seed_from_u64(1);
        let item = item_with_keywords(1, &["aaa bbb ccc", "bbb ccc ddd"]);
        for _ in 0..20 {
            let keyword = item.random_keyword(&mut rng);
            assert!(item.keyword_by_slug(keyword.slug()).is_some());
        }
    }

    #[test]
    fn test_keyword_by_slug() {
        let item = item_with_keywords(3, &["#Aaaa bbbb cccc", "#CCCC dddd ssss"]);
        let found = item.keyword_by_slug("cccc-dddd-ssss").unwrap();
        assert_eq!(found.phrase(), "#CCCC dddd ssss");
        assert!(item.keyword_by_slug("missing").is_none());
    }

    #[test]
    fn test_meta_keywords_and_duration() {
        let mut item = Item::new(1, "t", "t");
        item.add_tag(Arc::new(Keyword::tag(1, "tag 1")));
        item.add_tag(Arc::new(Keyword::tag(2, "tag 2")));
        item.add_model(Arc::new(Keyword::model(1, "model 1")));
        item.duration_secs = 3 * 3600 + 7 * 60 + 5;

        assert_eq!(item.meta_keywords(), "tag 1,tag 2,model 1");
        assert_eq!(item.duration_human(), "03:07:05");
    }

    #[test]
    fn test_title_tokens_use_decoded_title() {
        let rules = TextRules::default();
        let item = Item::new(1, "Tom &amp; Jerry", "tom-jerry");
        let tokens: Vec<String> = item.title_tokens(&rules, false).collect();
        assert_eq!(tokens, vec!["tom", "jerry"]);
    }

    #[test]
    fn test_item_ngrams() {
        let rules = TextRules::default();
        let item = Item::new(5, "title number 5 no keywords", "title-number-5");
        let grams = item.ngrams(&rules, true);
        assert_eq!(grams.bigrams, vec!["title number", "number 5", "5 keywords"]);
        assert_eq!(grams.trigrams, vec!["title number 5", "number 5 keywords"]);
    }
}
