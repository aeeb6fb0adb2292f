//! School year model

use crate::core::error::EffectifError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest first year accepted; keeps both halves four digits wide.
const FIRST_YEAR_MIN: u16 = 1000;
/// Highest first year accepted; its successor must still have four digits.
const FIRST_YEAR_MAX: u16 = 9998;

/// A school year spanning two consecutive calendar years (e.g., "2024-2025")
///
/// Ordering follows the first year, so sorting a list of school years puts
/// "2022-2023" before "2023-2024".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolYear {
    start: u16,
}

impl SchoolYear {
    /// Create a school year from its first calendar year
    ///
    /// # Errors
    /// Returns [`EffectifError::InvalidSchoolYear`] when either half would not
    /// be a four-digit year.
    pub fn starting(start: u16) -> Result<Self, EffectifError> {
        if !(FIRST_YEAR_MIN..=FIRST_YEAR_MAX).contains(&start) {
            return Err(EffectifError::InvalidSchoolYear {
                input: format!("{start}-{}", u32::from(start) + 1),
                reason: "years must have four digits".to_string(),
            });
        }
        Ok(Self { start })
    }

    /// First calendar year (2024 for "2024-2025")
    #[must_use]
    pub const fn start(self) -> u16 {
        self.start
    }

    /// Second calendar year (2025 for "2024-2025")
    #[must_use]
    pub const fn end(self) -> u16 {
        self.start + 1
    }

    /// The school year immediately before this one
    ///
    /// Both halves are decremented by one; no calendar logic is involved.
    ///
    /// # Errors
    /// Returns [`EffectifError::YearBelowFloor`] for "1000-1001", whose
    /// predecessor would no longer be a four-digit year.
    pub fn previous(self) -> Result<Self, EffectifError> {
        if self.start <= FIRST_YEAR_MIN {
            return Err(EffectifError::YearBelowFloor(self.to_string()));
        }
        Ok(Self {
            start: self.start - 1,
        })
    }
}

impl FromStr for SchoolYear {
    type Err = EffectifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EffectifError::InvalidSchoolYear {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (first, second) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected the YYYY-YYYY format"))?;

        let parse_half = |half: &str| -> Result<u16, EffectifError> {
            if half.len() != 4 || !half.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("expected the YYYY-YYYY format"));
            }
            half.parse::<u16>()
                .map_err(|_| invalid("expected the YYYY-YYYY format"))
        };

        let start = parse_half(first)?;
        let end = parse_half(second)?;

        if u32::from(end) != u32::from(start) + 1 {
            return Err(invalid("second year must follow the first year"));
        }

        Self::starting(start).map_err(|_| invalid("years must have four digits"))
    }
}

impl TryFrom<String> for SchoolYear {
    type Error = EffectifError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchoolYear> for String {
    fn from(year: SchoolYear) -> Self {
        year.to_string()
    }
}

impl fmt::Display for SchoolYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let year: SchoolYear = "2024-2025".parse().unwrap();
        assert_eq!(year.start(), 2024);
        assert_eq!(year.end(), 2025);
        assert_eq!(year.to_string(), "2024-2025");
    }

    #[test]
    fn test_previous_decrements_both_halves() {
        let year: SchoolYear = "2024-2025".parse().unwrap();
        assert_eq!(year.previous().unwrap().to_string(), "2023-2024");

        let year: SchoolYear = "2000-2001".parse().unwrap();
        assert_eq!(year.previous().unwrap().to_string(), "1999-2000");
    }

    #[test]
    fn test_previous_below_floor_is_an_error() {
        let year: SchoolYear = "1000-1001".parse().unwrap();
        assert!(matches!(
            year.previous(),
            Err(EffectifError::YearBelowFloor(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_years() {
        for input in [
            "",
            "2024",
            "2024-2026",
            "2025-2024",
            "24-25",
            "2024/2025",
            "2024-2025-2026",
            "abcd-efgh",
            "+202-2025",
            "0999-1000",
            "9999-10000",
        ] {
            assert!(
                matches!(
                    input.parse::<SchoolYear>(),
                    Err(EffectifError::InvalidSchoolYear { .. })
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_ordering_follows_first_year() {
        let mut years: Vec<SchoolYear> = ["2023-2024", "2022-2023", "2024-2025"]
            .iter()
            .map(|y| y.parse().unwrap())
            .collect();
        years.sort();
        assert_eq!(years[0].to_string(), "2022-2023");
        assert_eq!(years[2].to_string(), "2024-2025");
    }

    #[test]
    fn test_serde_uses_string_form() {
        let year: SchoolYear = "2024-2025".parse().unwrap();
        let json = serde_json::to_string(&year).unwrap();
        assert_eq!(json, "\"2024-2025\"");

        let back: SchoolYear = serde_json::from_str(&json).unwrap();
        assert_eq!(back, year);
        assert!(serde_json::from_str::<SchoolYear>("\"2024-2026\"").is_err());
    }
}
