//! Cosine similarity between feature vectors.
//!
//! cos(a, b) = (a · b) / (||a|| × ||b||)
//! Measures direction only: scaling either vector by a positive constant
//! leaves the result unchanged. For vectors with non-negative components the
//! result lies in [0, 1].
//! Edge cases: unequal lengths → `DimensionMismatch`; a zero-norm operand
//! (including an empty vector) → `UndefinedSimilarity`.

use crate::error::{CoreError, CoreResult, VectorSide};

pub fn cosine_similarity(a: &[f64], b: &[f64]) -> CoreResult<f64> {
    if a.len() != b.len() {
        return Err(CoreError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 {
        return Err(CoreError::UndefinedSimilarity {
            side: VectorSide::Left,
        });
    }
    if norm_b == 0.0 {
        return Err(CoreError::UndefinedSimilarity {
            side: VectorSide::Right,
        });
    }

    // Rounding can push |cos| a few ulps past 1.
    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}
