//! Catalog data model: vocabulary keywords, items and their origins.

mod item;
mod keyword;
mod origin;
mod slug;

pub use item::{Item, ItemId};
pub use keyword::{Keyword, KeywordId, KeywordKind, NOT_FOUND_PHRASE};
pub use origin::Origin;
pub use slug::{content_key, slugify, slugify_title};
