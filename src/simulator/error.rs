use thiserror::Error;

use crate::features::FeatureError;
use crate::graph::GraphError;

/// Errors raised by simulator sessions and the batch adapter.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Invalid simple action code: {0}")]
    InvalidAction(usize),

    #[error("Invalid navigable candidate index {index} ({available} candidates)")]
    InvalidCandidate { index: usize, available: usize },

    #[error("Expected {expected} per-slot arguments, got {actual}")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("Simulator session {0} has no episode")]
    NotStarted(usize),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Feature(#[from] FeatureError),
}
