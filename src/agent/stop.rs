//! Agent that never moves.

use super::trait_::Agent;
use crate::env::Observation;
use crate::simulator::Action;

/// Stops immediately; its trajectories are the start viewpoint alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct StopAgent;

impl Agent for StopAgent {
    fn act(&mut self, observations: &[Observation]) -> Vec<Action> {
        vec![Action::NOOP; observations.len()]
    }

    fn name(&self) -> &str {
        "stop"
    }
}
