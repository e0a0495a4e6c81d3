//! Serializable advice configuration.
//!
//! One TOML file describes a single advice request: the query vector, where
//! the reference tables come from, and optionally the blend inputs.
//!
//! ```toml
//! min_similarity = 0.8
//!
//! [query]
//! vector = [0.35, 0.75, 0.25, 0.45, 0.85, 0.70]
//! description = "Nervous market with negative news"
//!
//! [reference]
//! path = "seed.toml"
//!
//! [signals]
//! forecast_pct_change = 5.0
//! sentiment_compound = 0.7
//! trend = "uptrend"
//!
//! [blend]
//! input_policy = "clamp"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crudelab_core::blend::{BlendWeights, InputPolicy, SignalBlender, Signals};
use crudelab_core::normalize::{RawSignals, Trend};
use crudelab_core::FeatureVector;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdviceConfig {
    /// Flag (not override) recommendations whose best match scores lower.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,

    pub query: QueryConfig,

    #[serde(default)]
    pub reference: ReferenceConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<SignalsConfig>,

    #[serde(default)]
    pub blend: BlendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    pub vector: FeatureVector,
    #[serde(default)]
    pub description: String,
}

/// Where the reference tables come from. No path means the built-in set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReferenceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Blend inputs, either pre-normalized or raw. Exactly one form must be
/// complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SignalsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_pct_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_compound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl SignalsConfig {
    /// Resolves to normalized signals.
    pub fn resolve(&self) -> Result<Signals, ConfigError> {
        let normalized = (self.prediction, self.technical, self.sentiment);
        let raw = (self.forecast_pct_change, self.sentiment_compound, self.trend);

        let any_normalized =
            normalized.0.is_some() || normalized.1.is_some() || normalized.2.is_some();
        let any_raw = raw.0.is_some() || raw.1.is_some() || raw.2.is_some();

        match (normalized, raw) {
            ((Some(p), Some(t), Some(s)), _) if !any_raw => Ok(Signals::new(p, t, s)),
            (_, (Some(forecast_pct_change), Some(sentiment_compound), Some(trend)))
                if !any_normalized =>
            {
                Ok(RawSignals {
                    forecast_pct_change,
                    sentiment_compound,
                    trend,
                }
                .normalize())
            }
            _ if any_normalized && any_raw => Err(ConfigError::Invalid(
                "[signals] mixes normalized (prediction/technical/sentiment) and raw \
                 (forecast_pct_change/sentiment_compound/trend) fields"
                    .into(),
            )),
            _ => Err(ConfigError::Invalid(
                "[signals] needs all of prediction/technical/sentiment or all of \
                 forecast_pct_change/sentiment_compound/trend"
                    .into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BlendConfig {
    #[serde(default)]
    pub input_policy: InputPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<BlendWeights>,
}

impl BlendConfig {
    pub fn blender(&self) -> SignalBlender {
        SignalBlender::new(self.weights.unwrap_or_default(), self.input_policy)
    }
}

impl AdviceConfig {
    /// Config for a bare query against the built-in tables.
    pub fn for_query(vector: FeatureVector) -> Self {
        Self {
            min_similarity: None,
            query: QueryConfig {
                vector,
                description: String::new(),
            },
            reference: ReferenceConfig::default(),
            signals: None,
            blend: BlendConfig::default(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;

        // Relative seed paths are resolved against the config's directory.
        if let (Some(seed), Some(dir)) = (config.reference.path.as_mut(), path.parent()) {
            if seed.is_relative() {
                *seed = dir.join(&*seed);
            }
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.vector.is_empty() {
            return Err(ConfigError::Invalid("[query] vector is empty".into()));
        }
        if self.query.vector.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid(
                "[query] vector has non-finite components".into(),
            ));
        }
        if let Some(min) = self.min_similarity {
            if !(-1.0..=1.0).contains(&min) {
                return Err(ConfigError::Invalid(format!(
                    "min_similarity {min} is outside [-1, 1]"
                )));
            }
        }
        if let Some(w) = self.blend.weights {
            if ![w.prediction, w.technical, w.sentiment]
                .iter()
                .all(|x| x.is_finite())
            {
                return Err(ConfigError::Invalid("[blend.weights] must be finite".into()));
            }
        }
        if let Some(signals) = &self.signals {
            signals.resolve()?;
        }
        Ok(())
    }
}
