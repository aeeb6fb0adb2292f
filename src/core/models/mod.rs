//! Data models for `proved-effectifs`

pub mod effectif;
pub mod growth;
pub mod record;
pub mod school_year;
pub mod unit;

pub use effectif::{
    EffectifTotals, EffectifTree, GenderCount, HeadCount, MainstreamSecondary, PreschoolEffectifs,
    PrimaryEffectifs, SecondaryEffectifs,
};
pub use growth::{
    GenderRate, GrowthRateTree, HeadCountRate, MainstreamSecondaryRates, PreschoolRates,
    PrimaryRates, SecondaryRates,
};
pub use record::AnnualEffectifRecord;
pub use school_year::SchoolYear;
pub use unit::UnitRef;
