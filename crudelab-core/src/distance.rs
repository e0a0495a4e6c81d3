//! Distance metrics for side-by-side comparison with cosine similarity.
//!
//! Lower distance means more similar. Unlike cosine similarity these are
//! sensitive to magnitude, which is why ranking uses cosine.

use serde::{Deserialize, Serialize};

use crate::domain::SituationId;
use crate::error::{CoreError, CoreResult};
use crate::library::SituationLibrary;
use crate::similarity::cosine_similarity;

/// Default Minkowski order used by [`compare`].
pub const DEFAULT_MINKOWSKI_P: f64 = 3.0;

fn check_lengths(a: &[f64], b: &[f64]) -> CoreResult<()> {
    if a.len() != b.len() {
        return Err(CoreError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Sum of absolute component differences.
pub fn manhattan(a: &[f64], b: &[f64]) -> CoreResult<f64> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum())
}

/// Straight-line distance.
pub fn euclidean(a: &[f64], b: &[f64]) -> CoreResult<f64> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt())
}

/// Minkowski distance of order `p` (p = 1 is Manhattan, p = 2 is Euclidean).
pub fn minkowski(a: &[f64], b: &[f64], p: f64) -> CoreResult<f64> {
    if !p.is_finite() || p < 1.0 {
        return Err(CoreError::InvalidMinkowskiOrder(p));
    }
    check_lengths(a, b)?;
    let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs().powf(p)).sum();
    Ok(sum.powf(1.0 / p))
}

/// All four measures between the query and one historical situation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub situation_id: SituationId,
    pub manhattan: f64,
    pub euclidean: f64,
    pub minkowski: f64,
    pub cosine: f64,
}

/// Compares `query` against every situation, in library order.
pub fn compare(
    query: &[f64],
    library: &SituationLibrary,
    p: f64,
) -> CoreResult<Vec<MetricComparison>> {
    if library.is_empty() {
        return Err(CoreError::EmptyLibrary);
    }
    library
        .all_situations()
        .iter()
        .map(|s| {
            let v = s.vector.as_slice();
            Ok(MetricComparison {
                situation_id: s.id.clone(),
                manhattan: manhattan(query, v)?,
                euclidean: euclidean(query, v)?,
                minkowski: minkowski(query, v, p)?,
                cosine: cosine_similarity(query, v)?,
            })
        })
        .collect()
}
