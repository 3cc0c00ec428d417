//! Grid-operation phases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A grid-operation phase, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instant {
    Preventive,
    Outage,
    Auto,
    Curative,
}

impl Instant {
    pub const ALL: [Instant; 4] = [
        Instant::Preventive,
        Instant::Outage,
        Instant::Auto,
        Instant::Curative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Instant::Preventive => "preventive",
            Instant::Outage => "outage",
            Instant::Auto => "auto",
            Instant::Curative => "curative",
        }
    }

    /// Every instant except preventive is a post-contingency state.
    pub fn is_post_contingency(self) -> bool {
        !matches!(self, Instant::Preventive)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instant {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Instant::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::UnknownInstant(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chronological_order() {
        assert!(Instant::Preventive < Instant::Outage);
        assert!(Instant::Outage < Instant::Auto);
        assert!(Instant::Auto < Instant::Curative);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("CURATIVE".parse::<Instant>().unwrap(), Instant::Curative);
        assert!("later".parse::<Instant>().is_err());
    }

    #[test]
    fn test_post_contingency() {
        assert!(!Instant::Preventive.is_post_contingency());
        assert!(Instant::Auto.is_post_contingency());
    }
}
