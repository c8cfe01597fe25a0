//! Commodity catalog store.
//!
//! Records are stored as `commodities/<s1>/<s2>/<id>/commodity.yaml`. The catalog is small, so
//! lookups by name scan the stored records.

use crate::commodity::{CommodityRecord, StorageClass};
use crate::config::CoreConfig;
use crate::constants::COMMODITY_FILENAME;
use crate::repositories::helpers::{
    create_unique_sharded_dir, read_yaml, sharded_record_files, write_yaml,
};
use crate::{ContentError, ContentResult};
use emporium_types::NonEmptyText;
use emporium_uuid::RecordId;
use std::fs;
use std::sync::Arc;

/// Fields of a commodity supplied by the author; the store assigns the id.
#[derive(Clone, Debug)]
pub struct NewCommodity {
    pub name: NonEmptyText,
    pub storage: StorageClass,
    pub min_level: Option<u32>,
    pub max_level: Option<u32>,
    pub description: Option<RecordId>,
}

#[derive(Clone, Debug)]
pub struct CatalogStore {
    cfg: Arc<CoreConfig>,
}

impl CatalogStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Stores a new commodity.
    ///
    /// Name uniqueness is a check-then-write over the stored records, so two concurrent creates
    /// with one name can both succeed. Commodities are only created through the admin CLI.
    ///
    /// # Errors
    ///
    /// - [`ContentError::DuplicateName`] if a commodity with the same name exists.
    /// - [`ContentError::InvalidLevelRange`] if `min_level > max_level`.
    /// - Storage errors if the record cannot be written.
    pub fn create(&self, new: NewCommodity) -> ContentResult<CommodityRecord> {
        if self.find_by_name(new.name.as_str())?.is_some() {
            return Err(ContentError::DuplicateName(new.name.to_string()));
        }

        let (id, record_dir) =
            create_unique_sharded_dir(&self.cfg.commodities_dir(), RecordId::new)?;

        let result = CommodityRecord::new(
            id,
            new.name,
            new.storage,
            new.min_level,
            new.max_level,
            new.description,
        )
        .and_then(|record| {
            write_yaml(&record_dir.join(COMMODITY_FILENAME), &record).map(|()| record)
        });

        match result {
            Ok(record) => {
                tracing::info!(name = %record.name(), %id, "created commodity");
                Ok(record)
            }
            Err(e) => {
                if let Err(cleanup_error) = fs::remove_dir_all(&record_dir) {
                    tracing::warn!(
                        "failed to clean up {} after create error: {}",
                        record_dir.display(),
                        cleanup_error
                    );
                }
                Err(e)
            }
        }
    }

    /// Finds the commodity whose name matches exactly.
    ///
    /// Unparsable records are logged and skipped, as in [`CatalogStore::list`].
    pub fn find_by_name(&self, name: &str) -> ContentResult<Option<CommodityRecord>> {
        let name = name.trim();
        Ok(self
            .readable_records()
            .find(|record| record.name().as_str() == name))
    }

    /// Lists all commodities sorted by name. Unparsable records are logged and skipped.
    pub fn list(&self) -> Vec<CommodityRecord> {
        let mut records: Vec<CommodityRecord> = self.readable_records().collect();
        records.sort_by(|a, b| a.name().cmp(b.name()));
        records
    }

    fn readable_records(&self) -> impl Iterator<Item = CommodityRecord> {
        sharded_record_files(&self.cfg.commodities_dir(), COMMODITY_FILENAME)
            .into_iter()
            .filter_map(|path| match read_yaml::<CommodityRecord>(&path) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("failed to parse {}: {}", path.display(), e);
                    None
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(data_dir: &std::path::Path) -> CatalogStore {
        CatalogStore::new(Arc::new(
            CoreConfig::new(data_dir.to_path_buf()).expect("CoreConfig::new should succeed"),
        ))
    }

    fn new_commodity(name: &str, storage: StorageClass) -> NewCommodity {
        NewCommodity {
            name: NonEmptyText::new(name).unwrap(),
            storage,
            min_level: None,
            max_level: None,
            description: None,
        }
    }

    #[test]
    fn test_create_then_find_by_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        let description = RecordId::new();

        let created = store
            .create(NewCommodity {
                min_level: Some(2),
                max_level: Some(5),
                description: Some(description),
                ..new_commodity("Iron Ore", StorageClass::Bulk)
            })
            .unwrap();

        let found = store
            .find_by_name("Iron Ore")
            .unwrap()
            .expect("commodity should exist");
        assert_eq!(found, created);
        assert_eq!(found.storage(), StorageClass::Bulk);
        assert_eq!(found.description(), Some(description));
    }

    #[test]
    fn test_find_by_name_is_exact() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        store
            .create(new_commodity("Water", StorageClass::Fluid))
            .unwrap();

        assert!(store.find_by_name("water").unwrap().is_none());
        assert!(store.find_by_name("Wat").unwrap().is_none());
        assert!(store.find_by_name(" Water ").unwrap().is_some());
    }

    #[test]
    fn test_find_in_empty_catalog() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        assert!(store.find_by_name("Anything").unwrap().is_none());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        store
            .create(new_commodity("Grain", StorageClass::Standard))
            .unwrap();
        let err = store
            .create(new_commodity("Grain", StorageClass::Bulk))
            .expect_err("duplicate name should fail");

        assert!(matches!(err, ContentError::DuplicateName(_)));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_levels_without_leaving_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        let err = store
            .create(NewCommodity {
                min_level: Some(4),
                max_level: Some(1),
                ..new_commodity("Fuel", StorageClass::Hazardous)
            })
            .expect_err("inverted levels should fail");

        assert!(matches!(err, ContentError::InvalidLevelRange { .. }));
        assert!(sharded_record_files(&temp_dir.path().join("commodities"), COMMODITY_FILENAME)
            .is_empty());
    }

    #[test]
    fn test_corrupt_record_does_not_hide_others() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());
        store
            .create(new_commodity("Salt", StorageClass::Bulk))
            .unwrap();

        let bad_dir = RecordId::new().sharded_dir(&temp_dir.path().join("commodities"));
        fs::create_dir_all(&bad_dir).unwrap();
        fs::write(bad_dir.join(COMMODITY_FILENAME), "garbage: true\n").unwrap();

        assert_eq!(store.list().len(), 1);
        assert!(store.find_by_name("Salt").unwrap().is_some());
        assert!(store.find_by_name("Pepper").unwrap().is_none());

        store
            .create(new_commodity("Pepper", StorageClass::Standard))
            .expect("create should still work next to a corrupt record");
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_list_is_sorted_by_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = test_store(temp_dir.path());

        for (name, storage) in [
            ("Salt", StorageClass::Bulk),
            ("Chemicals", StorageClass::Hazardous),
            ("Oil", StorageClass::Fluid),
        ] {
            store.create(new_commodity(name, storage)).unwrap();
        }

        let names: Vec<String> = store
            .list()
            .iter()
            .map(|record| record.name().to_string())
            .collect();
        assert_eq!(names, vec!["Chemicals", "Oil", "Salt"]);
    }
}
