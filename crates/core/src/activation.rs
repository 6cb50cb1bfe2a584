//! Muscle activation levels.
//!
//! Stored and transmitted as one-letter codes (`H`, `M`, `L`); rendered to
//! clients alongside a human-readable label.

use serde::{Deserialize, Serialize};

/// How strongly an exercise recruits a muscle group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationLevel {
    #[serde(rename = "H")]
    High,
    #[default]
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Low,
}

impl ActivationLevel {
    pub const ALL: [ActivationLevel; 3] = [Self::High, Self::Medium, Self::Low];

    /// Storage / wire code.
    pub fn code(self) -> &'static str {
        match self {
            Self::High => "H",
            Self::Medium => "M",
            Self::Low => "L",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse a storage / wire code. Codes are case-sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.code() == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for level in ActivationLevel::ALL {
            assert_eq!(ActivationLevel::from_code(level.code()), Some(level));
        }
    }

    #[test]
    fn unknown_and_lowercase_codes_are_rejected() {
        assert_eq!(ActivationLevel::from_code("X"), None);
        assert_eq!(ActivationLevel::from_code("h"), None);
        assert_eq!(ActivationLevel::from_code("High"), None);
    }

    #[test]
    fn default_is_medium() {
        assert_eq!(ActivationLevel::default(), ActivationLevel::Medium);
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_value(ActivationLevel::High).unwrap();
        assert_eq!(json, "H");
        assert_eq!(ActivationLevel::Low.label(), "Low");
    }
}
