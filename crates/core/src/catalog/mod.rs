//! Video catalog - the in-memory multi-index over items and vocabulary.
//!
//! [`Catalog`] owns the item list, the tag/model/token/n-gram/content-key
//! indices and the vocabulary dictionaries behind a single reader-writer
//! lock. Ranking and sampling run against the indices under a shared guard.

mod index;
mod ranking;
mod sampling;
mod store;
mod types;

pub(crate) use index::CatalogIndex;
pub use sampling::sample_distinct;
pub use store::Catalog;
pub use types::*;
