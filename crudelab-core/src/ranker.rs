//! Total ranking of a situation library by cosine similarity to a query.
//!
//! Order: descending score; exactly equal scores keep library insertion
//! order (first inserted ranks first). NaN scores, which only a NaN query
//! can produce, rank after every number. The tie-break is part of the sort
//! key rather than a property of the sort algorithm.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::SituationId;
use crate::error::{CoreError, CoreResult};
use crate::library::SituationLibrary;
use crate::similarity::cosine_similarity;

/// One situation's similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub situation_id: SituationId,
    pub score: f64,
    /// Insertion position in the library.
    pub library_position: usize,
}

pub fn rank(query: &[f64], library: &SituationLibrary) -> CoreResult<Vec<SimilarityResult>> {
    if library.is_empty() {
        return Err(CoreError::EmptyLibrary);
    }

    let mut results = library
        .all_situations()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Ok(SimilarityResult {
                situation_id: s.id.clone(),
                score: cosine_similarity(query, s.vector.as_slice())?,
                library_position: i,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    results.sort_by(compare_ranked);

    debug!(
        candidates = results.len(),
        best = %results[0].situation_id,
        best_score = results[0].score,
        "ranked library"
    );
    Ok(results)
}

/// First `k` entries of [`rank`].
pub fn top_k(
    query: &[f64],
    library: &SituationLibrary,
    k: usize,
) -> CoreResult<Vec<SimilarityResult>> {
    let mut ranked = rank(query, library)?;
    ranked.truncate(k);
    Ok(ranked)
}

/// Score descending, NaN after every number, then library position.
fn compare_ranked(a: &SimilarityResult, b: &SimilarityResult) -> Ordering {
    let by_score = match (a.score.is_nan(), b.score.is_nan()) {
        (false, false) => b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal),
        (a_nan, b_nan) => a_nan.cmp(&b_nan),
    };
    by_score.then(a.library_position.cmp(&b.library_position))
}
