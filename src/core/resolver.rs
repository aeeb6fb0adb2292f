//! Previous-year effectif resolution

use crate::core::defaults::{BaselineSynthesizer, DefaultEffectifSynthesizer};
use crate::core::error::EffectifError;
use crate::core::models::{EffectifTree, SchoolYear, UnitRef};
use crate::core::store::EffectifStore;
use crate::{debug, warn};
use serde::Serialize;

/// Effectifs of the year preceding a target year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousYearEffectifs {
    /// The school year that was looked up
    pub resolved_year: SchoolYear,
    /// Stored counts, or the default baseline when none were stored
    pub tree: EffectifTree,
    /// `true` when `tree` is the default baseline
    pub is_default: bool,
    /// Human-readable explanation of where `tree` came from
    pub message: String,
}

/// Looks up last year's effectifs, falling back to a default baseline
///
/// A missing record is not an error: reports must still render, so the
/// synthesizer's tree is returned with `is_default` set.
#[derive(Debug, Clone, Default)]
pub struct PreviousYearResolver<D = BaselineSynthesizer> {
    synthesizer: D,
}

impl<D: DefaultEffectifSynthesizer> PreviousYearResolver<D> {
    /// Create a resolver using `synthesizer` for missing years
    #[must_use]
    pub const fn new(synthesizer: D) -> Self {
        Self { synthesizer }
    }

    /// Resolve the effectifs of the year before `target_year`
    ///
    /// Performs at most one storage read.
    ///
    /// # Errors
    /// - [`EffectifError::YearBelowFloor`] if `target_year` has no predecessor
    /// - [`EffectifError::Store`] if the storage read fails
    pub fn resolve<S>(
        &self,
        store: &S,
        unit: &UnitRef,
        target_year: SchoolYear,
    ) -> Result<PreviousYearEffectifs, EffectifError>
    where
        S: EffectifStore + ?Sized,
    {
        let resolved_year = target_year.previous()?;

        if let Some(record) = store.get(unit, resolved_year)? {
            debug!("Found {resolved_year} effectifs for {unit}");
            return Ok(PreviousYearEffectifs {
                resolved_year,
                tree: record.tree,
                is_default: false,
                message: format!("Effectifs for {resolved_year} loaded from history."),
            });
        }

        warn!("No {resolved_year} effectifs for {unit}; using default baseline");
        Ok(PreviousYearEffectifs {
            resolved_year,
            tree: self.synthesizer.generate(),
            is_default: true,
            message: format!(
                "No effectifs recorded for {resolved_year}; default baseline values are shown."
            ),
        })
    }
}
