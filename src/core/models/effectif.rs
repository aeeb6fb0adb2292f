//! Effectif tree model
//!
//! Enrollment counts of one administrative unit for one school year, laid out
//! along the fixed taxonomy of education levels. Preschool and primary leaves
//! count a total plus the girls among it; secondary leaves count boys and
//! girls separately. Field names are the stored document names.

use crate::core::error::EffectifError;
use serde::{Deserialize, Serialize};

/// Headcount leaf used by preschool and primary categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HeadCount {
    /// All pupils in the category
    pub total: u32,
    /// Girls among `total`
    pub female_only: u32,
}

impl HeadCount {
    /// Create a headcount leaf
    #[must_use]
    pub const fn new(total: u32, female_only: u32) -> Self {
        Self { total, female_only }
    }
}

/// Headcount leaf used by secondary categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenderCount {
    /// Boys enrolled
    pub boys: u32,
    /// Girls enrolled
    pub girls: u32,
}

impl GenderCount {
    /// Create a boys/girls leaf
    #[must_use]
    pub const fn new(boys: u32, girls: u32) -> Self {
        Self { boys, girls }
    }

    /// Boys and girls together
    #[must_use]
    pub const fn total(self) -> u64 {
        self.boys as u64 + self.girls as u64
    }
}

/// Preschool branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PreschoolEffectifs {
    /// Community awakening spaces
    pub community_awakening_space: HeadCount,
    /// Kindergarten
    pub kindergarten: HeadCount,
    /// Pre-primary classes
    pub pre_primary: HeadCount,
    /// Special preschool education
    pub special: HeadCount,
}

/// Primary branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrimaryEffectifs {
    /// Special primary education
    pub special_education: HeadCount,
    /// Mainstream primary education
    pub mainstream: HeadCount,
}

/// Mainstream secondary grade bands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MainstreamSecondary {
    /// 7th grade of the terminal basic education cycle (CTEB)
    pub seventh_grade_cteb: GenderCount,
    /// 8th grade of the terminal basic education cycle (CTEB)
    pub eighth_grade_cteb: GenderCount,
    /// First year of humanities
    pub first_humanities: GenderCount,
    /// Fourth year of humanities
    pub fourth_humanities: GenderCount,
}

/// Secondary branch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SecondaryEffectifs {
    /// Special secondary education
    pub special_education: GenderCount,
    /// Mainstream secondary grade bands
    pub mainstream: MainstreamSecondary,
}

/// Full enrollment snapshot of one unit for one school year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectifTree {
    /// Preschool counts
    pub preschool: PreschoolEffectifs,
    /// Primary counts
    pub primary: PrimaryEffectifs,
    /// Secondary counts
    pub secondary: SecondaryEffectifs,
}

/// Per-branch sums of an [`EffectifTree`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectifTotals {
    /// Preschool pupils
    pub preschool_total: u64,
    /// Preschool girls
    pub preschool_female: u64,
    /// Primary pupils
    pub primary_total: u64,
    /// Primary girls
    pub primary_female: u64,
    /// Secondary boys
    pub secondary_boys: u64,
    /// Secondary girls
    pub secondary_girls: u64,
    /// Secondary pupils
    pub secondary_total: u64,
}

impl EffectifTotals {
    /// Every pupil across all three branches
    #[must_use]
    pub const fn grand_total(&self) -> u64 {
        self.preschool_total + self.primary_total + self.secondary_total
    }
}

impl EffectifTree {
    /// Preschool and primary leaves with their dotted document paths
    #[must_use]
    pub const fn head_count_leaves(&self) -> [(&'static str, HeadCount); 6] {
        [
            (
                "preschool.communityAwakeningSpace",
                self.preschool.community_awakening_space,
            ),
            ("preschool.kindergarten", self.preschool.kindergarten),
            ("preschool.prePrimary", self.preschool.pre_primary),
            ("preschool.special", self.preschool.special),
            ("primary.specialEducation", self.primary.special_education),
            ("primary.mainstream", self.primary.mainstream),
        ]
    }

    /// Secondary leaves with their dotted document paths
    #[must_use]
    pub const fn gender_count_leaves(&self) -> [(&'static str, GenderCount); 5] {
        let mainstream = &self.secondary.mainstream;
        [
            ("secondary.specialEducation", self.secondary.special_education),
            (
                "secondary.mainstream.seventhGradeCteb",
                mainstream.seventh_grade_cteb,
            ),
            (
                "secondary.mainstream.eighthGradeCteb",
                mainstream.eighth_grade_cteb,
            ),
            (
                "secondary.mainstream.firstHumanities",
                mainstream.first_humanities,
            ),
            (
                "secondary.mainstream.fourthHumanities",
                mainstream.fourth_humanities,
            ),
        ]
    }

    /// Sum every branch
    #[must_use]
    pub fn totals(&self) -> EffectifTotals {
        let mut totals = EffectifTotals::default();

        for (path, leaf) in self.head_count_leaves() {
            if path.starts_with("preschool.") {
                totals.preschool_total += u64::from(leaf.total);
                totals.preschool_female += u64::from(leaf.female_only);
            } else {
                totals.primary_total += u64::from(leaf.total);
                totals.primary_female += u64::from(leaf.female_only);
            }
        }
        for (_, leaf) in self.gender_count_leaves() {
            totals.secondary_boys += u64::from(leaf.boys);
            totals.secondary_girls += u64::from(leaf.girls);
            totals.secondary_total += leaf.total();
        }

        totals
    }

    /// Paths of leaves whose girls count exceeds their total
    ///
    /// Submissions are accepted regardless; callers decide what to do with
    /// the report.
    #[must_use]
    pub fn inconsistencies(&self) -> Vec<&'static str> {
        self.head_count_leaves()
            .into_iter()
            .filter(|(_, leaf)| leaf.female_only > leaf.total)
            .map(|(path, _)| path)
            .collect()
    }

    /// Parse a tree from a TOML document
    ///
    /// # Errors
    /// Returns [`EffectifError::InvalidTreeDocument`] when a leaf is missing,
    /// unknown, negative or not an integer.
    pub fn from_toml_str(document: &str) -> Result<Self, EffectifError> {
        toml::from_str(document).map_err(|e| EffectifError::InvalidTreeDocument(e.to_string()))
    }

    /// Parse a tree from a JSON document
    ///
    /// # Errors
    /// Returns [`EffectifError::InvalidTreeDocument`] when a leaf is missing,
    /// unknown, negative or not an integer.
    pub fn from_json_str(document: &str) -> Result<Self, EffectifError> {
        serde_json::from_str(document)
            .map_err(|e| EffectifError::InvalidTreeDocument(e.to_string()))
    }

    /// Render the tree as a TOML document
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EffectifTree {
        EffectifTree {
            preschool: PreschoolEffectifs {
                community_awakening_space: HeadCount::new(10, 4),
                kindergarten: HeadCount::new(20, 9),
                pre_primary: HeadCount::new(30, 16),
                special: HeadCount::new(5, 2),
            },
            primary: PrimaryEffectifs {
                special_education: HeadCount::new(7, 3),
                mainstream: HeadCount::new(400, 210),
            },
            secondary: SecondaryEffectifs {
                special_education: GenderCount::new(3, 2),
                mainstream: MainstreamSecondary {
                    seventh_grade_cteb: GenderCount::new(50, 45),
                    eighth_grade_cteb: GenderCount::new(48, 40),
                    first_humanities: GenderCount::new(35, 30),
                    fourth_humanities: GenderCount::new(20, 18),
                },
            },
        }
    }

    #[test]
    fn test_totals_sum_each_branch() {
        let totals = sample().totals();
        assert_eq!(totals.preschool_total, 65);
        assert_eq!(totals.preschool_female, 31);
        assert_eq!(totals.primary_total, 407);
        assert_eq!(totals.primary_female, 213);
        assert_eq!(totals.secondary_boys, 156);
        assert_eq!(totals.secondary_girls, 135);
        assert_eq!(totals.secondary_total, 156 + 135);
        assert_eq!(totals.grand_total(), 65 + 407 + 156 + 135);
    }

    #[test]
    fn test_inconsistencies_lists_offending_leaves() {
        let mut tree = sample();
        assert!(tree.inconsistencies().is_empty());

        tree.preschool.kindergarten = HeadCount::new(3, 4);
        tree.primary.mainstream = HeadCount::new(0, 1);
        assert_eq!(
            tree.inconsistencies(),
            vec!["preschool.kindergarten", "primary.mainstream"]
        );
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value["preschool"]["communityAwakeningSpace"]["femaleOnly"],
            4
        );
        assert_eq!(value["primary"]["specialEducation"]["total"], 7);
        assert_eq!(value["secondary"]["specialEducation"]["boys"], 3);
        assert_eq!(
            value["secondary"]["mainstream"]["seventhGradeCteb"]["girls"],
            45
        );
        assert_eq!(value["secondary"]["mainstream"]["fourthHumanities"]["boys"], 20);
    }

    #[test]
    fn test_toml_document_round_trip() {
        let tree = sample();
        let document = tree.to_toml_string().unwrap();
        assert!(document.contains("[preschool.kindergarten]"));
        assert_eq!(EffectifTree::from_toml_str(&document).unwrap(), tree);
    }

    #[test]
    fn test_missing_leaf_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["primary"]
            .as_object_mut()
            .unwrap()
            .remove("mainstream");
        let err = EffectifTree::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, EffectifError::InvalidTreeDocument(_)));
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["preschool"]["special"]["total"] = serde_json::json!(-1);
        assert!(EffectifTree::from_json_str(&value.to_string()).is_err());
    }
}
