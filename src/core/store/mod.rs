//! Persistence of annual effectif records
//!
//! A store keeps at most one [`AnnualEffectifRecord`] per (unit, school
//! year). The uniqueness is enforced by the backend itself; `upsert` is a
//! single conditional write, never a lookup followed by an insert.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryEffectifStore;
pub use sqlite::SqliteEffectifStore;

use crate::core::error::StoreError;
use crate::core::models::{AnnualEffectifRecord, EffectifTree, SchoolYear, UnitRef};

/// Storage backend for annual effectif records
pub trait EffectifStore: Send + Sync {
    /// Create the record for (unit, year) or replace its tree.
    ///
    /// The whole tree is written atomically. `updated_at` only moves when the
    /// stored tree actually changes.
    ///
    /// # Errors
    /// - [`StoreError::Conflict`] if the backend reports a uniqueness violation
    /// - [`StoreError::Unavailable`] if the backend cannot be reached
    fn upsert(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
        tree: &EffectifTree,
    ) -> Result<AnnualEffectifRecord, StoreError>;

    /// Point lookup; a missing record is `Ok(None)`.
    ///
    /// # Errors
    /// Returns an error only when the backend fails or the row is corrupt.
    fn get(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
    ) -> Result<Option<AnnualEffectifRecord>, StoreError>;

    /// All records of a unit, newest school year first.
    ///
    /// # Errors
    /// Returns an error only when the backend fails or a row is corrupt.
    fn list_history(&self, unit: &UnitRef) -> Result<Vec<AnnualEffectifRecord>, StoreError>;
}

impl<S: EffectifStore + ?Sized> EffectifStore for std::sync::Arc<S> {
    fn upsert(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
        tree: &EffectifTree,
    ) -> Result<AnnualEffectifRecord, StoreError> {
        (**self).upsert(unit, year, tree)
    }

    fn get(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
    ) -> Result<Option<AnnualEffectifRecord>, StoreError> {
        (**self).get(unit, year)
    }

    fn list_history(&self, unit: &UnitRef) -> Result<Vec<AnnualEffectifRecord>, StoreError> {
        (**self).list_history(unit)
    }
}
