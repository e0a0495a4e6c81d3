//! Nearest-neighbour recommendation (k = 1).
//!
//! 1. Rank the whole library against the query.
//! 2. Take the top entry as the best match.
//! 3. Resolve its outcome through the library, then the catalog.
//! 4. Return the action together with the evidence: best match, its score
//!    and the full ranking.
//!
//! No minimum similarity is applied: a query that resembles nothing still
//! gets the action of whatever ranks first. Callers that want a confidence
//! gate check [`Recommendation::meets`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::ActionCatalog;
use crate::domain::{ActionDescriptor, FeatureVector, HistoricalSituation};
use crate::error::{CoreError, CoreResult};
use crate::library::SituationLibrary;
use crate::ranker::{rank, SimilarityResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: ActionDescriptor,
    pub matched: HistoricalSituation,
    pub similarity: f64,
    /// Every situation, best first.
    pub ranking: Vec<SimilarityResult>,
}

impl Recommendation {
    /// Whether the best match reaches `min_similarity`.
    pub fn meets(&self, min_similarity: f64) -> bool {
        self.similarity >= min_similarity
    }

    pub fn runner_up(&self) -> Option<&SimilarityResult> {
        self.ranking.get(1)
    }
}

pub fn recommend(
    query: &FeatureVector,
    library: &SituationLibrary,
    catalog: &ActionCatalog,
) -> CoreResult<Recommendation> {
    let ranking = rank(query.as_slice(), library)?;
    let best = ranking.first().ok_or(CoreError::EmptyLibrary)?;

    let outcome = library.outcome_of(&best.situation_id)?;
    let action = catalog.lookup(outcome)?.clone();
    let matched = library
        .get(&best.situation_id)
        .cloned()
        .ok_or_else(|| CoreError::UnknownSituation(best.situation_id.clone()))?;
    let similarity = best.score;

    debug!(
        matched = %matched.id,
        action = %action.id,
        similarity,
        "recommendation resolved"
    );

    Ok(Recommendation {
        action,
        matched,
        similarity,
        ranking,
    })
}
