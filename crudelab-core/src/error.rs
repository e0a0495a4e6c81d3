//! Structured error types for the recommendation core.
//!
//! Every variant is fatal for the call that produced it. The core never
//! retries and never substitutes a default action when a lookup fails.

use thiserror::Error;

use crate::domain::{ActionId, SituationId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("dimension mismatch: left vector has {left} components, right has {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("similarity undefined: {side} vector has zero norm")]
    UndefinedSimilarity { side: VectorSide },

    #[error("situation library is empty")]
    EmptyLibrary,

    #[error("unknown situation: {0}")]
    UnknownSituation(SituationId),

    #[error("unknown action: {0}")]
    UnknownAction(ActionId),

    #[error("situation {id} has non-finite component {value} at index {index}")]
    NonFiniteComponent {
        id: SituationId,
        index: usize,
        value: f64,
    },

    #[error("duplicate situation id: {0}")]
    DuplicateSituation(SituationId),

    #[error("duplicate action id: {0}")]
    DuplicateAction(ActionId),

    #[error("invalid Minkowski order {0}: must be finite and >= 1")]
    InvalidMinkowskiOrder(f64),

    #[error("{name} signal {value} is outside [0, 1]")]
    SignalOutOfRange { name: &'static str, value: f64 },
}

/// Which operand of a pairwise comparison an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorSide {
    Left,
    Right,
}

impl std::fmt::Display for VectorSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorSide::Left => write!(f, "left"),
            VectorSide::Right => write!(f, "right"),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
