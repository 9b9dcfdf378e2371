use thiserror::Error;

use crate::dataset::DatasetError;
use crate::features::FeatureError;
use crate::graph::GraphError;
use crate::simulator::SimulatorError;

/// Errors raised while building or stepping a [`NavEnvironment`](super::NavEnvironment).
#[derive(Debug, Error)]
pub enum EnvError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Simulator(#[from] SimulatorError),

    #[error("Batch size {batch_size} exceeds the {items} available instructions")]
    BatchTooLarge { batch_size: usize, items: usize },

    #[error("Batch size must be at least 1")]
    EmptyBatch,

    #[error("Instruction {0} has an empty reference path")]
    EmptyPath(String),
}
