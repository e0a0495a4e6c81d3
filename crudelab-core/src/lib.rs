//! CrudeLab Core — similarity-based action recommendation for crude oil markets.
//!
//! This crate contains the decision logic and nothing else:
//! - Domain types (feature vectors, historical situations, action descriptors)
//! - Cosine similarity, plus distance metrics for comparison
//! - Situation library and action catalog (ordered, immutable, indexed)
//! - Ranking with deterministic insertion-order tie-break
//! - Nearest-neighbour recommendation (k = 1)
//! - Weighted signal blending with a table-driven decision band mapping
//!
//! Data acquisition, forecasting and sentiment models, and report rendering
//! live outside this crate; they hand in vectors or signals and receive a
//! [`engine::Recommendation`] or [`blend::BlendOutcome`].

pub mod blend;
pub mod catalog;
pub mod distance;
pub mod domain;
pub mod engine;
pub mod error;
pub mod library;
pub mod normalize;
pub mod ranker;
pub mod reference;
pub mod seed;
pub mod similarity;

pub use blend::{BlendOutcome, BlendWeights, BlendedAction, InputPolicy, SignalBlender, Signals};
pub use catalog::ActionCatalog;
pub use domain::{
    ActionDescriptor, ActionId, FeatureVector, HistoricalSituation, RiskLevel, SituationId,
};
pub use engine::{recommend, Recommendation};
pub use error::{CoreError, CoreResult};
pub use library::SituationLibrary;
pub use ranker::{rank, SimilarityResult};
pub use reference::{ReferenceData, SeedError, SharedReference};
pub use similarity::cosine_similarity;
