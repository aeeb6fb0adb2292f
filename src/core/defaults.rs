//! Default effectif baseline used when no history exists

use crate::core::models::{
    EffectifTree, GenderCount, HeadCount, MainstreamSecondary, PreschoolEffectifs,
    PrimaryEffectifs, SecondaryEffectifs,
};

/// Strategy producing the baseline tree shown when a unit has no record for
/// the previous school year.
///
/// Implementations must be deterministic: every call returns the same tree.
pub trait DefaultEffectifSynthesizer: Send + Sync {
    /// Produce the baseline tree
    fn generate(&self) -> EffectifTree;
}

/// Fixed, non-zero baseline of a mid-sized province
///
/// | Leaf | Values |
/// |---|---|
/// | preschool.communityAwakeningSpace | total 120, girls 62 |
/// | preschool.kindergarten | total 450, girls 228 |
/// | preschool.prePrimary | total 300, girls 149 |
/// | preschool.special | total 40, girls 18 |
/// | primary.specialEducation | total 80, girls 35 |
/// | primary.mainstream | total 2500, girls 1210 |
/// | secondary.specialEducation | boys 30, girls 25 |
/// | secondary.mainstream.seventhGradeCteb | boys 400, girls 380 |
/// | secondary.mainstream.eighthGradeCteb | boys 380, girls 355 |
/// | secondary.mainstream.firstHumanities | boys 350, girls 330 |
/// | secondary.mainstream.fourthHumanities | boys 300, girls 275 |
#[derive(Debug, Clone, Copy, Default)]
pub struct BaselineSynthesizer;

impl DefaultEffectifSynthesizer for BaselineSynthesizer {
    fn generate(&self) -> EffectifTree {
        EffectifTree {
            preschool: PreschoolEffectifs {
                community_awakening_space: HeadCount::new(120, 62),
                kindergarten: HeadCount::new(450, 228),
                pre_primary: HeadCount::new(300, 149),
                special: HeadCount::new(40, 18),
            },
            primary: PrimaryEffectifs {
                special_education: HeadCount::new(80, 35),
                mainstream: HeadCount::new(2500, 1210),
            },
            secondary: SecondaryEffectifs {
                special_education: GenderCount::new(30, 25),
                mainstream: MainstreamSecondary {
                    seventh_grade_cteb: GenderCount::new(400, 380),
                    eighth_grade_cteb: GenderCount::new(380, 355),
                    first_humanities: GenderCount::new(350, 330),
                    fourth_humanities: GenderCount::new(300, 275),
                },
            },
        }
    }
}
