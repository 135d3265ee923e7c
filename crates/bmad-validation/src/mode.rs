//! Validation strictness modes

use crate::error::ValidationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Required fraction of an item's predicates that must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Every predicate must hold
    Strict,
    /// At least 70% of predicates
    #[default]
    Standard,
    /// At least half of the predicates
    Lenient,
}

impl ValidationMode {
    /// All modes, loosest first
    pub const ALL: [ValidationMode; 3] = [
        ValidationMode::Lenient,
        ValidationMode::Standard,
        ValidationMode::Strict,
    ];

    /// Pass threshold as an exact fraction `(numerator, denominator)`
    #[inline]
    #[must_use]
    pub const fn threshold(self) -> (usize, usize) {
        match self {
            ValidationMode::Strict => (1, 1),
            ValidationMode::Standard => (7, 10),
            ValidationMode::Lenient => (1, 2),
        }
    }

    /// Whether `held` of `total` predicates meets the threshold
    ///
    /// Compared in integers so 7 of 10 passes standard exactly.
    #[inline]
    #[must_use]
    pub fn passes(self, held: usize, total: usize) -> bool {
        let (num, den) = self.threshold();
        held * den >= total * num
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Standard => "standard",
            ValidationMode::Lenient => "lenient",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ValidationMode::Strict),
            "standard" => Ok(ValidationMode::Standard),
            "lenient" => Ok(ValidationMode::Lenient),
            _ => Err(ValidationError::InvalidMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!("strict".parse(), Ok(ValidationMode::Strict));
        assert_eq!(" Standard ".parse(), Ok(ValidationMode::Standard));
        assert_eq!("LENIENT".parse(), Ok(ValidationMode::Lenient));
        assert_eq!(
            "relaxed".parse::<ValidationMode>(),
            Err(ValidationError::InvalidMode("relaxed".to_string()))
        );
    }

    #[test]
    fn thresholds() {
        assert!(ValidationMode::Strict.passes(3, 3));
        assert!(!ValidationMode::Strict.passes(2, 3));
        assert!(ValidationMode::Standard.passes(7, 10));
        assert!(!ValidationMode::Standard.passes(2, 3));
        assert!(ValidationMode::Lenient.passes(1, 2));
        assert!(!ValidationMode::Lenient.passes(1, 3));
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&ValidationMode::Lenient).unwrap();
        assert_eq!(json, "\"lenient\"");
        assert_eq!(ValidationMode::default(), ValidationMode::Standard);
    }
}
