//! Single advice run: load reference tables, recommend, optionally blend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crudelab_core::blend::BlendOutcome;
use crudelab_core::domain::ComponentReading;
use crudelab_core::{CoreError, FeatureVector, Recommendation, ReferenceData, SeedError};

use crate::config::{AdviceConfig, ConfigError, ReferenceConfig};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("reference data error: {0}")]
    Seed(#[from] SeedError),
    #[error("recommendation failed: {0}")]
    Core(#[from] CoreError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid query file: {0}")]
    Query(String),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Complete result of one advice run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// BLAKE3 of the config plus the reference fingerprint.
    pub run_id: String,
    pub created_at: NaiveDateTime,
    pub reference_fingerprint: String,

    pub query: FeatureVector,
    #[serde(default)]
    pub description: String,
    pub breakdown: Vec<ComponentReading>,

    pub recommendation: Recommendation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_similarity: Option<f64>,
    /// Best match scored under `min_similarity`. The action is still the
    /// nearest neighbour's.
    #[serde(default)]
    pub below_threshold: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend: Option<BlendOutcome>,
}

pub fn load_reference(config: &ReferenceConfig) -> Result<ReferenceData, RunError> {
    match &config.path {
        Some(path) => Ok(ReferenceData::from_file(path)?),
        None => Ok(ReferenceData::builtin()),
    }
}

/// Deterministic id: identical config + identical reference tables give
/// the same id.
pub fn run_id(config: &AdviceConfig, reference_fingerprint: &str) -> Result<String, RunError> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&serde_json::to_vec(config)?);
    hasher.update(reference_fingerprint.as_bytes());
    Ok(hasher.finalize().to_hex().to_string())
}

pub fn run_advice(config: &AdviceConfig) -> Result<AdviceResult, RunError> {
    config.validate()?;
    let reference = load_reference(&config.reference)?;
    run_advice_with(config, &reference)
}

/// Runs against already-loaded reference tables.
pub fn run_advice_with(
    config: &AdviceConfig,
    reference: &ReferenceData,
) -> Result<AdviceResult, RunError> {
    let fingerprint = reference.fingerprint();
    let run_id = run_id(config, &fingerprint)?;

    let recommendation = reference.recommend(&config.query.vector)?;

    let below_threshold = config
        .min_similarity
        .is_some_and(|min| !recommendation.meets(min));
    if below_threshold {
        warn!(
            similarity = recommendation.similarity,
            min_similarity = config.min_similarity,
            matched = %recommendation.matched.id,
            "best match is below the configured minimum similarity"
        );
    }

    let blend = config
        .signals
        .as_ref()
        .map(|signals| -> Result<BlendOutcome, RunError> {
            let signals = signals.resolve()?;
            Ok(config.blend.blender().blend(signals)?)
        })
        .transpose()?;

    info!(
        run_id = %&run_id[..12],
        matched = %recommendation.matched.id,
        action = %recommendation.action.id,
        similarity = recommendation.similarity,
        "advice complete"
    );

    Ok(AdviceResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        created_at: chrono::Local::now().naive_local(),
        reference_fingerprint: fingerprint,
        breakdown: config.query.vector.breakdown(),
        query: config.query.vector.clone(),
        description: config.query.description.clone(),
        recommendation,
        min_similarity: config.min_similarity,
        below_threshold,
        blend,
    })
}
