//! Feature vectors describing a market situation.
//!
//! A vector is an ordered sequence of reals, conventionally in [0, 1]. The
//! canonical layout has six dimensions (see [`FeatureDimension`]), but the
//! core accepts any length: two vectors are comparable only when their
//! lengths match, and that is checked at comparison time, not here.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean (L2) norm.
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Component-wise multiplication by `k`.
    pub fn scaled(&self, k: f64) -> Self {
        Self(self.0.iter().map(|v| v * k).collect())
    }

    /// Pairs each component with its dimension name and level.
    ///
    /// Vectors with the canonical six-component layout get the canonical
    /// dimension labels; anything else is labelled `dim_<i>`.
    pub fn breakdown(&self) -> Vec<ComponentReading> {
        let canonical = self.0.len() == FeatureDimension::ALL.len();
        self.0
            .iter()
            .enumerate()
            .map(|(i, &value)| ComponentReading {
                name: if canonical {
                    FeatureDimension::ALL[i].label().to_string()
                } else {
                    format!("dim_{i}")
                },
                value,
                level: FeatureLevel::classify(value),
            })
            .collect()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[f64; N]> for FeatureVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v:.2}")?;
        }
        write!(f, "]")
    }
}

/// The six canonical dimensions, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureDimension {
    PriceTrend,
    Volatility,
    Sentiment,
    Demand,
    Inventories,
    GeopoliticalRisk,
}

impl FeatureDimension {
    pub const ALL: [FeatureDimension; 6] = [
        FeatureDimension::PriceTrend,
        FeatureDimension::Volatility,
        FeatureDimension::Sentiment,
        FeatureDimension::Demand,
        FeatureDimension::Inventories,
        FeatureDimension::GeopoliticalRisk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FeatureDimension::PriceTrend => "price_trend",
            FeatureDimension::Volatility => "volatility",
            FeatureDimension::Sentiment => "sentiment",
            FeatureDimension::Demand => "demand",
            FeatureDimension::Inventories => "inventories",
            FeatureDimension::GeopoliticalRisk => "geopolitical_risk",
        }
    }
}

/// Coarse reading of a normalized component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureLevel {
    Low,
    Medium,
    High,
}

impl FeatureLevel {
    /// `> 0.66` is high, `> 0.33` is medium, everything else is low.
    pub fn classify(value: f64) -> Self {
        if value > 0.66 {
            FeatureLevel::High
        } else if value > 0.33 {
            FeatureLevel::Medium
        } else {
            FeatureLevel::Low
        }
    }
}

impl fmt::Display for FeatureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureLevel::Low => "LOW",
            FeatureLevel::Medium => "MEDIUM",
            FeatureLevel::High => "HIGH",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentReading {
    pub name: String,
    pub value: f64,
    pub level: FeatureLevel,
}
