//! Agent that follows the teacher.

use super::trait_::Agent;
use crate::env::Observation;
use crate::simulator::Action;

/// Replays each observation's shortest-path teacher action.
///
/// An upper bound on navigation performance: it always stops at the goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestAgent;

impl Agent for ShortestAgent {
    fn act(&mut self, observations: &[Observation]) -> Vec<Action> {
        observations.iter().map(|o| o.teacher).collect()
    }

    fn name(&self) -> &str {
        "shortest"
    }
}
