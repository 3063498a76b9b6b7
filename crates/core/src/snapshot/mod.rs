//! Snapshot persistence for the catalog.
//!
//! Three bincode streams live under the storage root: `tags` and `models`
//! (id → keyword dictionaries) and `videos` (item records referencing the
//! dictionaries by id). Dictionaries must be loaded before items.

mod record;
mod store;

pub use record::{ItemRecord, KeywordRecord};
pub use store::SnapshotStore;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors from snapshot dump/load.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to encode {path}: {reason}")]
    Encode { path: PathBuf, reason: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl SnapshotError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True when the snapshot content is unusable, as opposed to unreachable.
    pub fn is_corrupt(&self) -> bool {
        match self {
            SnapshotError::Decode { .. } => true,
            SnapshotError::Catalog(e) => e.is_fatal(),
            _ => false,
        }
    }
}

/// Entry counts written or read by a snapshot operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub tags: usize,
    pub models: usize,
    pub items: usize,
}
