//! Administrative unit reference

use crate::core::error::EffectifError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque reference to an administrative unit (a PROVED office)
///
/// The unit directory itself lives outside this crate; only the identifier
/// is kept. Surrounding whitespace is trimmed and control characters are
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnitRef(String);

impl UnitRef {
    /// Create a unit reference from a raw identifier
    ///
    /// # Errors
    /// Returns [`EffectifError::InvalidUnit`] if the identifier is blank or
    /// contains control characters.
    pub fn new(raw: &str) -> Result<Self, EffectifError> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(EffectifError::InvalidUnit(
                "identifier must not be empty".to_string(),
            ));
        }
        if id.chars().any(char::is_control) {
            return Err(EffectifError::InvalidUnit(format!(
                "identifier '{}' contains control characters",
                id.escape_debug()
            )));
        }
        Ok(Self(id.to_string()))
    }

    /// The identifier as stored
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UnitRef {
    type Err = EffectifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for UnitRef {
    type Error = EffectifError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<UnitRef> for String {
    fn from(unit: UnitRef) -> Self {
        unit.0
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_identifier() {
        let unit = UnitRef::new("  proved-kinshasa-est ").unwrap();
        assert_eq!(unit.as_str(), "proved-kinshasa-est");
    }

    #[test]
    fn test_rejects_blank_and_control_characters() {
        assert!(UnitRef::new("").is_err());
        assert!(UnitRef::new("   ").is_err());
        assert!(UnitRef::new("proved\u{0}x").is_err());
    }
}
