//! Snapshot dump/load against a storage root.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info};

use super::{ItemRecord, KeywordRecord, SnapshotError, SnapshotSummary};
use crate::catalog::{Catalog, CatalogIndex};
use crate::config::StorageConfig;
use crate::metrics;
use crate::model::{Keyword, KeywordId};

const TAGS_FILE: &str = "tags";
const MODELS_FILE: &str = "models";
const VIDEOS_FILE: &str = "videos";

type Dictionary = BTreeMap<KeywordId, KeywordRecord>;

/// Reads and writes the `tags`, `models` and `videos` streams under `root`.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tags_path(&self) -> PathBuf {
        self.root.join(TAGS_FILE)
    }

    pub fn models_path(&self) -> PathBuf {
        self.root.join(MODELS_FILE)
    }

    pub fn videos_path(&self) -> PathBuf {
        self.root.join(VIDEOS_FILE)
    }

    // ----- Dump -----

    /// Write all three streams, dictionaries first.
    ///
    /// Holds the catalog's write lock throughout so the streams describe one
    /// point in time.
    pub fn dump(&self, catalog: &Catalog) -> Result<SnapshotSummary, SnapshotError> {
        let _timer = metrics::SNAPSHOT_DURATION
            .with_label_values(&["dump"])
            .start_timer();

        let index = catalog.write();
        let result = self.dump_index(&index);
        drop(index);

        match &result {
            Ok(summary) => info!(
                "Dumped snapshot to {}: {} tags, {} models, {} items",
                self.root.display(),
                summary.tags,
                summary.models,
                summary.items
            ),
            Err(e) => {
                metrics::SNAPSHOT_FAILURES.with_label_values(&["dump"]).inc();
                error!("Snapshot dump to {} failed: {}", self.root.display(), e);
            }
        }
        result
    }

    fn dump_index(&self, index: &CatalogIndex) -> Result<SnapshotSummary, SnapshotError> {
        Ok(SnapshotSummary {
            tags: self.write_dictionary(&self.tags_path(), index.dict_tags.values().map(|k| k.as_ref()))?,
            models: self.write_dictionary(&self.models_path(), index.dict_models.values().map(|k| k.as_ref()))?,
            items: self.write_items(index)?,
        })
    }

    pub fn dump_tags(&self, catalog: &Catalog) -> Result<usize, SnapshotError> {
        let index = catalog.write();
        self.write_dictionary(&self.tags_path(), index.dict_tags.values().map(|k| k.as_ref()))
    }

    pub fn dump_models(&self, catalog: &Catalog) -> Result<usize, SnapshotError> {
        let index = catalog.write();
        self.write_dictionary(&self.models_path(), index.dict_models.values().map(|k| k.as_ref()))
    }

    pub fn dump_items(&self, catalog: &Catalog) -> Result<usize, SnapshotError> {
        let index = catalog.write();
        self.write_items(&index)
    }

    fn write_dictionary<'a>(
        &self,
        path: &Path,
        keywords: impl Iterator<Item = &'a Keyword>,
    ) -> Result<usize, SnapshotError> {
        let dictionary: Dictionary = keywords.map(|k| (k.id(), KeywordRecord::from(k))).collect();
        write_stream(path, &dictionary)?;
        Ok(dictionary.len())
    }

    fn write_items(&self, index: &CatalogIndex) -> Result<usize, SnapshotError> {
        let records: Vec<ItemRecord> = index.items.iter().map(|item| ItemRecord::from(item.as_ref())).collect();
        write_stream(&self.videos_path(), &records)?;
        Ok(records.len())
    }

    // ----- Load -----

    /// Replace the catalog's contents with the snapshot.
    ///
    /// All streams are decoded and a fresh index is built before anything is
    /// swapped in; on any error the catalog is left untouched. The SEO pool
    /// is not part of the snapshot and survives the reload.
    pub fn load(&self, catalog: &Catalog) -> Result<SnapshotSummary, SnapshotError> {
        let _timer = metrics::SNAPSHOT_DURATION
            .with_label_values(&["load"])
            .start_timer();

        let mut index = catalog.write();
        let result = self.load_fresh(catalog).map(|mut fresh| {
            fresh.seo_pool = std::mem::take(&mut index.seo_pool);
            let summary = SnapshotSummary {
                tags: fresh.dict_tags.len(),
                models: fresh.dict_models.len(),
                items: fresh.items.len(),
            };
            *index = fresh;
            summary
        });
        drop(index);

        match &result {
            Ok(summary) => info!(
                "Loaded snapshot from {}: {} tags, {} models, {} items",
                self.root.display(),
                summary.tags,
                summary.models,
                summary.items
            ),
            Err(e) => {
                metrics::SNAPSHOT_FAILURES.with_label_values(&["load"]).inc();
                error!("Snapshot load from {} failed: {}", self.root.display(), e);
            }
        }
        result
    }

    fn load_fresh(&self, catalog: &Catalog) -> Result<CatalogIndex, SnapshotError> {
        let tags = read_dictionary(&self.tags_path())?;
        let models = read_dictionary(&self.models_path())?;
        let records: Vec<ItemRecord> = read_stream(&self.videos_path())?;
        Ok(CatalogIndex::hydrate(tags, models, records, catalog.rules())?)
    }

    /// Upsert every tag of the tags stream into the catalog.
    pub fn load_tags(&self, catalog: &Catalog) -> Result<usize, SnapshotError> {
        let tags = read_dictionary(&self.tags_path())?;
        let count = tags.len();
        let mut index = catalog.write();
        for tag in tags {
            index.upsert_tag(tag);
        }
        Ok(count)
    }

    /// Upsert every model of the models stream into the catalog.
    pub fn load_models(&self, catalog: &Catalog) -> Result<usize, SnapshotError> {
        let models = read_dictionary(&self.models_path())?;
        let count = models.len();
        let mut index = catalog.write();
        for model in models {
            index.upsert_model(model);
        }
        Ok(count)
    }

    /// Register every record of the videos stream.
    ///
    /// Tags and models must already be loaded. Every record is resolved
    /// before the first insert, so an integrity violation adds nothing.
    pub fn load_items(&self, catalog: &Catalog) -> Result<usize, SnapshotError> {
        let records: Vec<ItemRecord> = read_stream(&self.videos_path())?;
        let mut index = catalog.write();
        let items = records
            .into_iter()
            .map(|record| index.resolve_record(record))
            .collect::<Result<Vec<_>, _>>()?;

        let count = items.len();
        for item in items {
            index.insert(item, catalog.rules());
        }
        Ok(count)
    }
}

fn read_dictionary(path: &Path) -> Result<Vec<Keyword>, SnapshotError> {
    let dictionary: Dictionary = read_stream(path)?;
    Ok(dictionary.into_values().map(Keyword::from).collect())
}

fn read_stream<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let bytes = fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
    bincode::deserialize(&bytes).map_err(|e| SnapshotError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Encode `value` into a sibling temp file, then rename it over `path`.
fn write_stream<T: Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
    }

    let bytes = bincode::serialize(value).map_err(|e| SnapshotError::Encode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| SnapshotError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| SnapshotError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::testing::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_dump_creates_root_and_streams() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested").join("snap"));
        let catalog = fixtures::abc_catalog();

        let summary = store.dump(&catalog).unwrap();
        assert_eq!(summary, SnapshotSummary { tags: 6, models: 0, items: 3 });
        assert!(store.tags_path().exists());
        assert!(store.models_path().exists());
        assert!(store.videos_path().exists());
        assert!(!store.videos_path().with_extension("tmp").exists());
    }

    #[test]
    fn test_load_missing_streams_is_io_error() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let catalog = fixtures::abc_catalog();

        let err = store.load(&catalog).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_corrupt_stream_is_decode_error() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.dump(&fixtures::abc_catalog()).unwrap();
        fs::write(store.videos_path(), b"\x01\x02garbage").unwrap();

        let catalog = Catalog::default();
        let err = store.load(&catalog).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode { .. }));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_items_before_vocabulary_fails_atomically() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.dump(&fixtures::abc_catalog()).unwrap();

        let catalog = Catalog::default();
        let err = store.load_items(&catalog).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Catalog(CatalogError::IntegrityViolation { .. })
        ));
        assert!(catalog.is_empty());

        assert_eq!(store.load_tags(&catalog).unwrap(), 6);
        assert_eq!(store.load_models(&catalog).unwrap(), 0);
        assert_eq!(store.load_items(&catalog).unwrap(), 3);
        assert_eq!(catalog.items_by_tag("t2").len(), 2);
    }

    #[test]
    fn test_load_with_missing_tag_keeps_existing_catalog() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        let source = fixtures::abc_catalog();
        store.dump(&source).unwrap();

        // drop t6 from the dictionary: item C now dangles
        let mut tags: Dictionary = read_stream(&store.tags_path()).unwrap();
        tags.remove(&6);
        write_stream(&store.tags_path(), &tags).unwrap();

        let target = Catalog::default();
        target.register(fixtures::item(999999, "survivor"));
        let err = store.load(&target).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::Catalog(CatalogError::IntegrityViolation { keyword_id: 6, .. })
        ));
        assert_eq!(target.len(), 1);
        assert_eq!(target.get_item(999999).unwrap().title, "survivor");
    }

    #[test]
    fn test_load_keeps_seo_pool() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.dump(&fixtures::abc_catalog()).unwrap();

        let catalog = Catalog::default();
        catalog.register_seo_keyword(Keyword::free(1, "seo phrase"));
        store.load(&catalog).unwrap();

        assert_eq!(catalog.stats().seo_keywords, 1);
        assert_eq!(catalog.len(), 3);
    }
}
