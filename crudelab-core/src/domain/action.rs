use serde::{Deserialize, Serialize};
use std::fmt;

use super::ActionId;

/// How forcefully an action changes exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggressiveness {
    Aggressive,
    Moderate,
    Neutral,
    Defensive,
}

impl fmt::Display for Aggressiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Aggressiveness::Aggressive => "AGGRESSIVE",
            Aggressiveness::Moderate => "MODERATE",
            Aggressiveness::Neutral => "NEUTRAL",
            Aggressiveness::Defensive => "DEFENSIVE",
        };
        write!(f, "{s}")
    }
}

/// Risk tag shared by catalog actions and blended decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::MediumHigh => "MEDIUM_HIGH",
            RiskLevel::High => "HIGH",
        };
        write!(f, "{s}")
    }
}

/// Static metadata for a recommendable action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: ActionId,
    /// Human-readable label, e.g. "SELL CRUDE".
    pub label: String,
    pub level: Aggressiveness,
    pub rationale: String,
    pub risk: RiskLevel,
    /// Free-form horizon tag, e.g. "2-3 weeks".
    pub horizon: String,
}

impl ActionDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        level: Aggressiveness,
        rationale: impl Into<String>,
        risk: RiskLevel,
        horizon: impl Into<String>,
    ) -> Self {
        Self {
            id: ActionId::new(id),
            label: label.into(),
            level,
            rationale: rationale.into(),
            risk,
            horizon: horizon.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_in_screaming_case() {
        let json = serde_json::to_string(&RiskLevel::MediumHigh).unwrap();
        assert_eq!(json, "\"MEDIUM_HIGH\"");
        let level: Aggressiveness = serde_json::from_str("\"DEFENSIVE\"").unwrap();
        assert_eq!(level, Aggressiveness::Defensive);
    }
}
