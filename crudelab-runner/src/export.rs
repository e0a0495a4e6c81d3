//! On-disk artifacts of an advice run.
//!
//! A run directory holds `recommendation.json` (the whole `AdviceResult`,
//! readable back with [`load_artifacts`]) and `ranking.csv` (every
//! situation's similarity, best first). Files written by a newer build
//! carry a higher `schema_version` and are refused on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use crudelab_core::SimilarityResult;

use crate::runner::{AdviceResult, SCHEMA_VERSION};

/// Length of the run-id prefix used for artifact directory names.
pub const RUN_DIR_PREFIX_LEN: usize = 12;

// ─── recommendation.json ────────────────────────────────────────────

pub fn advice_to_json(result: &AdviceResult) -> Result<String> {
    serde_json::to_string_pretty(result)
        .with_context(|| format!("encode advice run {}", result.run_id))
}

/// Parses a stored advice run. Only schema versions up to
/// [`SCHEMA_VERSION`] are understood.
pub fn advice_from_json(json: &str) -> Result<AdviceResult> {
    let result: AdviceResult = serde_json::from_str(json).context("decode advice run")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "advice run {} uses schema v{}, this build reads up to v{}",
            result.run_id,
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── ranking.csv ────────────────────────────────────────────────────

/// Header: rank, situation_id, similarity, library_position. Rank is
/// 1-based; similarity has six decimals.
pub fn ranking_to_csv(ranking: &[SimilarityResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["rank", "situation_id", "similarity", "library_position"])?;
    for (i, r) in ranking.iter().enumerate() {
        wtr.write_record([
            &(i + 1).to_string(),
            r.situation_id.as_str(),
            &format!("{:.6}", r.score),
            &r.library_position.to_string(),
        ])?;
    }
    let bytes = wtr.into_inner().context("flush ranking CSV")?;
    String::from_utf8(bytes).context("ranking CSV is not UTF-8")
}

// ─── run directory ──────────────────────────────────────────────────

/// Writes `recommendation.json` and `ranking.csv` into
/// `output_dir/<first 12 hex chars of run_id>/` and returns that path.
/// Re-running the same advice overwrites its own directory.
pub fn save_artifacts(result: &AdviceResult, output_dir: &Path) -> Result<PathBuf> {
    let prefix_len = RUN_DIR_PREFIX_LEN.min(result.run_id.len());
    let run_dir = output_dir.join(&result.run_id[..prefix_len]);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("create run directory {}", run_dir.display()))?;

    let json_path = run_dir.join("recommendation.json");
    std::fs::write(&json_path, advice_to_json(result)?)
        .with_context(|| format!("write {}", json_path.display()))?;

    let csv_path = run_dir.join("ranking.csv");
    std::fs::write(&csv_path, ranking_to_csv(&result.recommendation.ranking)?)
        .with_context(|| format!("write {}", csv_path.display()))?;

    Ok(run_dir)
}

/// Reads `recommendation.json` back from a run directory.
pub fn load_artifacts(dir: &Path) -> Result<AdviceResult> {
    let path = dir.join("recommendation.json");
    let json =
        std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    advice_from_json(&json)
}
