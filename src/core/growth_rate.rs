//! Year-over-year growth rates

use crate::core::models::{
    EffectifTree, GenderCount, GenderRate, GrowthRateTree, HeadCount, HeadCountRate,
    MainstreamSecondary, MainstreamSecondaryRates, PreschoolEffectifs, PreschoolRates,
    PrimaryEffectifs, PrimaryRates, SecondaryEffectifs, SecondaryRates,
};

/// Percentage change from `previous` to `current`, rounded to two decimals.
///
/// A zero baseline has no meaningful rate and yields exactly `0.0`. The
/// division is carried out in hundredths of a percent with integer
/// arithmetic, so ties round away from zero without binary floating-point
/// drift (`1 -> 33` gives `3200.0`, `32 -> 33` gives `3.13`).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_rate(current: u32, previous: u32) -> f64 {
    if previous == 0 {
        return 0.0;
    }

    let previous = i64::from(previous);
    let delta = (i64::from(current) - previous) * 10_000;
    // (2*delta +/- previous) / (2*previous) truncates to delta/previous rounded half away from zero
    let hundredths = (2 * delta + delta.signum() * previous) / (2 * previous);

    hundredths as f64 / 100.0
}

/// Compute growth rates for every leaf of two effectif trees.
///
/// Both trees are walked in lock-step; each leaf of the output is derived
/// from the leaf at the same position in `current` and `previous`. Neither
/// input is modified.
#[must_use]
pub fn compute_growth_rates(current: &EffectifTree, previous: &EffectifTree) -> GrowthRateTree {
    GrowthRateTree {
        preschool: preschool_rates(&current.preschool, &previous.preschool),
        primary: primary_rates(&current.primary, &previous.primary),
        secondary: secondary_rates(&current.secondary, &previous.secondary),
    }
}

fn head_count_rate(current: HeadCount, previous: HeadCount) -> HeadCountRate {
    HeadCountRate {
        total_rate: compute_rate(current.total, previous.total),
        female_rate: compute_rate(current.female_only, previous.female_only),
    }
}

fn gender_rate(current: GenderCount, previous: GenderCount) -> GenderRate {
    GenderRate {
        boys_rate: compute_rate(current.boys, previous.boys),
        girls_rate: compute_rate(current.girls, previous.girls),
    }
}

fn preschool_rates(current: &PreschoolEffectifs, previous: &PreschoolEffectifs) -> PreschoolRates {
    PreschoolRates {
        community_awakening_space: head_count_rate(
            current.community_awakening_space,
            previous.community_awakening_space,
        ),
        kindergarten: head_count_rate(current.kindergarten, previous.kindergarten),
        pre_primary: head_count_rate(current.pre_primary, previous.pre_primary),
        special: head_count_rate(current.special, previous.special),
    }
}

fn primary_rates(current: &PrimaryEffectifs, previous: &PrimaryEffectifs) -> PrimaryRates {
    PrimaryRates {
        special_education: head_count_rate(current.special_education, previous.special_education),
        mainstream: head_count_rate(current.mainstream, previous.mainstream),
    }
}

fn mainstream_secondary_rates(
    current: &MainstreamSecondary,
    previous: &MainstreamSecondary,
) -> MainstreamSecondaryRates {
    MainstreamSecondaryRates {
        seventh_grade_cteb: gender_rate(current.seventh_grade_cteb, previous.seventh_grade_cteb),
        eighth_grade_cteb: gender_rate(current.eighth_grade_cteb, previous.eighth_grade_cteb),
        first_humanities: gender_rate(current.first_humanities, previous.first_humanities),
        fourth_humanities: gender_rate(current.fourth_humanities, previous.fourth_humanities),
    }
}

fn secondary_rates(current: &SecondaryEffectifs, previous: &SecondaryEffectifs) -> SecondaryRates {
    SecondaryRates {
        special_education: gender_rate(current.special_education, previous.special_education),
        mainstream: mainstream_secondary_rates(&current.mainstream, &previous.mainstream),
    }
}
