//! Growth-rate tree model
//!
//! Mirrors [`EffectifTree`](super::EffectifTree) branch for branch; each leaf
//! holds percentage changes rounded to two decimals.

use serde::{Deserialize, Serialize};

/// Rates of a `{total, femaleOnly}` leaf
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadCountRate {
    /// Change of the total, in percent
    pub total_rate: f64,
    /// Change of the girls count, in percent
    pub female_rate: f64,
}

/// Rates of a `{boys, girls}` leaf
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderRate {
    /// Change of the boys count, in percent
    pub boys_rate: f64,
    /// Change of the girls count, in percent
    pub girls_rate: f64,
}

/// Preschool rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreschoolRates {
    /// Community awakening spaces
    pub community_awakening_space: HeadCountRate,
    /// Kindergarten
    pub kindergarten: HeadCountRate,
    /// Pre-primary classes
    pub pre_primary: HeadCountRate,
    /// Special preschool education
    pub special: HeadCountRate,
}

/// Primary rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryRates {
    /// Special primary education
    pub special_education: HeadCountRate,
    /// Mainstream primary education
    pub mainstream: HeadCountRate,
}

/// Mainstream secondary rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainstreamSecondaryRates {
    /// 7th grade CTEB
    pub seventh_grade_cteb: GenderRate,
    /// 8th grade CTEB
    pub eighth_grade_cteb: GenderRate,
    /// First year of humanities
    pub first_humanities: GenderRate,
    /// Fourth year of humanities
    pub fourth_humanities: GenderRate,
}

/// Secondary rates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryRates {
    /// Special secondary education
    pub special_education: GenderRate,
    /// Mainstream secondary grade bands
    pub mainstream: MainstreamSecondaryRates,
}

/// Year-over-year growth rates for every leaf of an effectif tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateTree {
    /// Preschool rates
    pub preschool: PreschoolRates,
    /// Primary rates
    pub primary: PrimaryRates,
    /// Secondary rates
    pub secondary: SecondaryRates,
}
