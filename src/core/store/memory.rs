//! In-process effectif store

use super::EffectifStore;
use crate::core::error::StoreError;
use crate::core::models::{AnnualEffectifRecord, EffectifTree, SchoolYear, UnitRef};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Effectif store backed by an ordered map behind a mutex
///
/// The map key is (unit, year), so a second record for the same key cannot
/// exist; every operation holds the lock for its whole duration.
#[derive(Debug, Default)]
pub struct MemoryEffectifStore {
    records: Mutex<BTreeMap<(UnitRef, SchoolYear), AnnualEffectifRecord>>,
}

impl MemoryEffectifStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all units
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }

    /// Whether the store holds no record
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(
        &self,
    ) -> Result<
        std::sync::MutexGuard<'_, BTreeMap<(UnitRef, SchoolYear), AnnualEffectifRecord>>,
        StoreError,
    > {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl EffectifStore for MemoryEffectifStore {
    fn upsert(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
        tree: &EffectifTree,
    ) -> Result<AnnualEffectifRecord, StoreError> {
        let now = Utc::now();
        let mut records = self.lock()?;

        let record = records
            .entry((unit.clone(), year))
            .and_modify(|existing| {
                if existing.tree != *tree {
                    existing.tree = *tree;
                    existing.updated_at = now;
                }
            })
            .or_insert_with(|| AnnualEffectifRecord {
                unit: unit.clone(),
                year,
                tree: *tree,
                created_at: now,
                updated_at: now,
            });

        Ok(record.clone())
    }

    fn get(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
    ) -> Result<Option<AnnualEffectifRecord>, StoreError> {
        Ok(self.lock()?.get(&(unit.clone(), year)).cloned())
    }

    fn list_history(&self, unit: &UnitRef) -> Result<Vec<AnnualEffectifRecord>, StoreError> {
        let records = self.lock()?;
        Ok(records
            .values()
            .rev()
            .filter(|record| record.key().0 == unit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::HeadCount;

    fn unit(id: &str) -> UnitRef {
        UnitRef::new(id).unwrap()
    }

    fn year(y: &str) -> SchoolYear {
        y.parse().unwrap()
    }

    #[test]
    fn test_upsert_creates_then_replaces() {
        let store = MemoryEffectifStore::new();
        let mut tree = EffectifTree::default();

        let created = store.upsert(&unit("u1"), year("2024-2025"), &tree).unwrap();
        assert_eq!(created.created_at, created.updated_at);

        tree.primary.mainstream = HeadCount::new(10, 5);
        let updated = store.upsert(&unit("u1"), year("2024-2025"), &tree).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(updated.tree, tree);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_identical_upsert_keeps_timestamps() {
        let store = MemoryEffectifStore::new();
        let tree = EffectifTree::default();
        let first = store.upsert(&unit("u1"), year("2024-2025"), &tree).unwrap();
        let second = store.upsert(&unit("u1"), year("2024-2025"), &tree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_history_is_newest_first_and_per_unit() {
        let store = MemoryEffectifStore::new();
        let tree = EffectifTree::default();
        for y in ["2023-2024", "2022-2023", "2024-2025"] {
            store.upsert(&unit("u1"), year(y), &tree).unwrap();
        }
        store.upsert(&unit("u2"), year("2021-2022"), &tree).unwrap();

        let history = store.list_history(&unit("u1")).unwrap();
        let years: Vec<String> = history.iter().map(|r| r.year.to_string()).collect();
        assert_eq!(years, vec!["2024-2025", "2023-2024", "2022-2023"]);

        assert!(store.list_history(&unit("u3")).unwrap().is_empty());
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = MemoryEffectifStore::new();
        assert!(store.get(&unit("u1"), year("2024-2025")).unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }
}
