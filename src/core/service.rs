//! Effectif service
//!
//! Entry point used by report generation: fetch last year's effectifs, save
//! the current year's, list a unit's history and compare two years.

use crate::core::defaults::{BaselineSynthesizer, DefaultEffectifSynthesizer};
use crate::core::error::{EffectifError, StoreError};
use crate::core::growth_rate::compute_growth_rates;
use crate::core::models::{
    AnnualEffectifRecord, EffectifTree, GrowthRateTree, SchoolYear, UnitRef,
};
use crate::core::resolver::{PreviousYearEffectifs, PreviousYearResolver};
use crate::core::store::EffectifStore;
use crate::{debug, info, warn};
use serde::Serialize;

/// Current-year effectifs compared with the previous year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthComparison {
    /// Year being reported on
    pub year: SchoolYear,
    /// Counts of `year`
    pub current: EffectifTree,
    /// Counts of the year before, possibly the default baseline
    pub previous: PreviousYearEffectifs,
    /// Growth from `previous` to `current`
    pub rates: GrowthRateTree,
}

/// Orchestrates the store, the previous-year resolver and the growth-rate
/// calculator
pub struct EffectifService<S, D = BaselineSynthesizer> {
    store: S,
    resolver: PreviousYearResolver<D>,
}

impl<S: EffectifStore> EffectifService<S> {
    /// Create a service falling back to [`BaselineSynthesizer`]
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self::with_synthesizer(store, BaselineSynthesizer)
    }
}

impl<S: EffectifStore, D: DefaultEffectifSynthesizer> EffectifService<S, D> {
    /// Create a service with a custom fallback baseline
    #[must_use]
    pub const fn with_synthesizer(store: S, synthesizer: D) -> Self {
        Self {
            store,
            resolver: PreviousYearResolver::new(synthesizer),
        }
    }

    /// Underlying store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Effectifs of the year before `target_year`, or the default baseline
    ///
    /// # Errors
    /// - [`EffectifError::YearBelowFloor`] if `target_year` has no predecessor
    /// - [`EffectifError::Store`] if the lookup fails
    pub fn get_previous_year_effectifs(
        &self,
        unit: &UnitRef,
        target_year: SchoolYear,
    ) -> Result<PreviousYearEffectifs, EffectifError> {
        self.resolver.resolve(&self.store, unit, target_year)
    }

    /// Save the effectifs of `unit` for `year`, creating or replacing the record
    ///
    /// Saving the same tree twice leaves a single unchanged record. Girls
    /// counts above their totals are logged but accepted. A uniqueness
    /// conflict reported by the store is retried once as an upsert.
    ///
    /// # Errors
    /// Returns [`EffectifError::Store`] if the write fails (after the retry
    /// for conflicts).
    pub fn save_effectifs(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
        tree: &EffectifTree,
    ) -> Result<AnnualEffectifRecord, EffectifError> {
        for path in tree.inconsistencies() {
            warn!("{unit}/{year}: {path} has more girls than pupils in total");
        }

        let record = match self.store.upsert(unit, year, tree) {
            Err(StoreError::Conflict { reason, .. }) => {
                warn!("Upsert of {unit}/{year} conflicted ({reason}); retrying once");
                self.store.upsert(unit, year, tree)?
            }
            other => other?,
        };

        info!("Saved effectifs for {unit} ({year})");
        Ok(record)
    }

    /// Stored effectifs of `unit` for `year`, if any
    ///
    /// # Errors
    /// Returns [`EffectifError::Store`] if the lookup fails.
    pub fn get_effectifs(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
    ) -> Result<Option<AnnualEffectifRecord>, EffectifError> {
        Ok(self.store.get(unit, year)?)
    }

    /// Every record of `unit`, newest school year first (empty if none)
    ///
    /// # Errors
    /// Returns [`EffectifError::Store`] if the listing fails.
    pub fn get_history(&self, unit: &UnitRef) -> Result<Vec<AnnualEffectifRecord>, EffectifError> {
        let history = self.store.list_history(unit)?;
        debug!("{} effectif record(s) for {unit}", history.len());
        Ok(history)
    }

    /// Growth rates of `year` against the year before
    ///
    /// Uses `current` when given, otherwise the stored record for `year`.
    /// The previous year falls back to the default baseline like
    /// [`get_previous_year_effectifs`](Self::get_previous_year_effectifs).
    ///
    /// # Errors
    /// - [`EffectifError::MissingRecord`] if `current` is `None` and nothing is stored for `year`
    /// - [`EffectifError::YearBelowFloor`] if `year` has no predecessor
    /// - [`EffectifError::Store`] if a lookup fails
    pub fn compare_with_previous_year(
        &self,
        unit: &UnitRef,
        year: SchoolYear,
        current: Option<&EffectifTree>,
    ) -> Result<GrowthComparison, EffectifError> {
        let current = match current {
            Some(tree) => *tree,
            None => {
                self.store
                    .get(unit, year)?
                    .ok_or_else(|| EffectifError::MissingRecord {
                        unit: unit.to_string(),
                        year: year.to_string(),
                    })?
                    .tree
            }
        };

        let previous = self.get_previous_year_effectifs(unit, year)?;
        let rates = compute_growth_rates(&current, &previous.tree);

        Ok(GrowthComparison {
            year,
            current,
            previous,
            rates,
        })
    }
}
