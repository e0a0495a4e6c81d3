//! Domain types: identifiers, feature vectors, situations, actions.

pub mod action;
pub mod ids;
pub mod situation;
pub mod vector;

pub use action::{ActionDescriptor, Aggressiveness, RiskLevel};
pub use ids::{ActionId, SituationId};
pub use situation::HistoricalSituation;
pub use vector::{ComponentReading, FeatureDimension, FeatureLevel, FeatureVector};
