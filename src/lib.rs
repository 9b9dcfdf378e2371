//! r2rnav - batched Room-to-Room navigation environment
//!
//! Discretized viewpoint navigation over per-scan connectivity graphs, with a
//! shortest-path teacher oracle and an offline trajectory evaluator.

pub mod agent;
pub mod dataset;
pub mod env;
pub mod eval;
pub mod features;
pub mod geometry;
pub mod graph;
pub mod oracle;
pub mod simulator;

#[cfg(test)]
pub(crate) mod test_utils;

pub use agent::Agent;
pub use dataset::{DatasetRecord, InstructionItem};
pub use env::{EnvConfig, NavEnvironment, Observation};
pub use eval::{Evaluation, ScoreSummary, Submission};
pub use features::{FeatureSource, FeatureStore};
pub use graph::NavGraphIndex;
pub use oracle::ShortestPathOracle;
pub use simulator::{Action, EnvBatch, SimState, Simulator};

/// Identifier type used for scans and viewpoints.
pub type Id = String;
