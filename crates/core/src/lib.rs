pub mod catalog;
pub mod config;
pub mod metrics;
pub mod model;
pub mod snapshot;
pub mod testing;
pub mod text;

pub use catalog::{
    sample_distinct, Catalog, CatalogError, CatalogStats, KeywordPool, RankedHit,
    RankedItems,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, ConfigError,
};
pub use model::{content_key, Item, ItemId, Keyword, KeywordId, KeywordKind, Origin};
pub use snapshot::{ItemRecord, KeywordRecord, SnapshotError, SnapshotStore, SnapshotSummary};
pub use text::TextRules;
