//! Stored annual effectif record

use super::{EffectifTree, SchoolYear, UnitRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit's effectifs for one school year, as persisted
///
/// At most one record exists per (unit, year); later submissions for the
/// same key replace `tree` in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualEffectifRecord {
    /// Owning administrative unit
    pub unit: UnitRef,
    /// School year the counts belong to
    pub year: SchoolYear,
    /// Submitted counts
    pub tree: EffectifTree,
    /// First submission time
    pub created_at: DateTime<Utc>,
    /// Last time `tree` changed
    pub updated_at: DateTime<Utc>,
}

impl AnnualEffectifRecord {
    /// Storage key of this record
    #[must_use]
    pub fn key(&self) -> (&UnitRef, SchoolYear) {
        (&self.unit, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_unit_and_year() {
        let now = Utc::now();
        let record = AnnualEffectifRecord {
            unit: UnitRef::new("proved-kwilu-1").unwrap(),
            year: "2024-2025".parse().unwrap(),
            tree: EffectifTree::default(),
            created_at: now,
            updated_at: now,
        };

        let (unit, year) = record.key();
        assert_eq!(unit.as_str(), "proved-kwilu-1");
        assert_eq!(year.to_string(), "2024-2025");
    }
}
