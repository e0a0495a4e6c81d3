use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ActionId, FeatureVector, SituationId};

/// A past market state whose successful action is known.
///
/// Built once when the library is assembled and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSituation {
    pub id: SituationId,
    pub vector: FeatureVector,
    pub description: String,
    #[serde(default)]
    pub context: String,
    pub date: NaiveDate,
    /// Action that worked in this situation; must resolve in the catalog.
    pub outcome: ActionId,
}

impl HistoricalSituation {
    pub fn new(
        id: impl Into<String>,
        vector: impl Into<FeatureVector>,
        description: impl Into<String>,
        context: impl Into<String>,
        date: NaiveDate,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            id: SituationId::new(id),
            vector: vector.into(),
            description: description.into(),
            context: context.into(),
            date,
            outcome: ActionId::new(outcome),
        }
    }
}
