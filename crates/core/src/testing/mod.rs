//! Testing utilities shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use vidcat_core::testing::fixtures;
//!
//! let catalog = fixtures::abc_catalog();
//! assert_eq!(catalog.items_by_tag("t2").len(), 2);
//! ```

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::catalog::Catalog;
    use crate::model::{slugify_title, Item, ItemId, Keyword, Origin};
    use crate::snapshot::ItemRecord;

    pub const ITEM_A: ItemId = 100001;
    pub const ITEM_B: ItemId = 100002;
    pub const ITEM_C: ItemId = 100003;

    /// Create an item whose slug is derived from its title.
    pub fn item(id: ItemId, title: &str) -> Item {
        let mut item = Item::new(id, title, slugify_title(title));
        item.origin = Origin::Xvideos;
        item.origin_id = format!("x{id}");
        item.origin_url = format!("https://www.xvideos.com/video{id}/");
        item.duration_secs = 600;
        item.modified_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        item
    }

    /// Create a snapshot record with no vocabulary references.
    pub fn record(id: ItemId, title: &str) -> ItemRecord {
        ItemRecord::from(&item(id, title))
    }

    /// Create an item tagged with the given (already registered) tags.
    pub fn tagged_item(id: ItemId, title: &str, tags: &[Arc<Keyword>]) -> Item {
        let mut item = item(id, title);
        for tag in tags {
            item.add_tag(Arc::clone(tag));
        }
        item
    }

    /// Catalog with tags `t1..t6` and items
    /// `A{t1,t2}`, `B{t2,t3}`, `C{t3,t4,t5,t6}` registered in that order.
    pub fn abc_catalog() -> Catalog {
        let catalog = Catalog::default();
        let tags: Vec<Arc<Keyword>> = (1..=6)
            .map(|i| catalog.register_tag(Keyword::tag(i, format!("t{i}"))))
            .collect();

        catalog.register(tagged_item(ITEM_A, "alpha item", &tags[0..2]));
        catalog.register(tagged_item(ITEM_B, "bravo item", &tags[1..3]));
        catalog.register(tagged_item(ITEM_C, "charlie item", &tags[2..6]));
        catalog
    }
}
