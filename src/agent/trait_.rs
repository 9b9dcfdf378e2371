//! Agent trait for the navigation environment.

use crate::env::Observation;
use crate::simulator::Action;

/// Chooses one action per batch slot from the slots' observations.
///
/// Returning [`Action::NOOP`] for a slot ends that slot's episode during a
/// [`rollout`](super::rollout).
pub trait Agent {
    /// Called once per episode with the initial observations.
    fn begin_episode(&mut self, _observations: &[Observation]) {}

    /// Selects one action per slot.
    ///
    /// # Arguments
    ///
    /// * `observations` - Current observations, slot order
    ///
    /// # Returns
    ///
    /// A vector of actions, one per slot.
    fn act(&mut self, observations: &[Observation]) -> Vec<Action>;

    /// Returns a human-readable name for this agent.
    fn name(&self) -> &str;
}
