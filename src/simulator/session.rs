use super::action::Action;
use super::error::SimulatorError;
use super::state::SimState;

/// One simulator session, the authoritative source of positional state.
///
/// The environment drives sessions strictly through this trait, so the
/// graph-backed [`GraphSimulator`](super::GraphSimulator) and an external
/// renderer binding are interchangeable.
pub trait Simulator: Send {
    /// Starts a new episode at `viewpoint` with the given camera angles.
    fn new_episode(
        &mut self,
        scan: &str,
        viewpoint: &str,
        heading: f64,
        elevation: f64,
    ) -> Result<(), SimulatorError>;

    /// Fails exactly when [`new_episode`](Self::new_episode) at this
    /// location would, without changing the session.
    fn check_start(&self, scan: &str, viewpoint: &str) -> Result<(), SimulatorError>;

    /// Fails exactly when [`make_action`](Self::make_action) would reject
    /// `action`, without changing the session.
    fn check_action(&self, action: Action) -> Result<(), SimulatorError> {
        let state = self.state().ok_or(SimulatorError::NotStarted(0))?;
        if action.index < state.navigable.len() {
            Ok(())
        } else {
            Err(SimulatorError::InvalidCandidate {
                index: action.index,
                available: state.navigable.len(),
            })
        }
    }

    /// Applies one action.
    ///
    /// # Errors
    ///
    /// `InvalidCandidate` when `action.index` is not a navigable candidate.
    fn make_action(&mut self, action: Action) -> Result<(), SimulatorError>;

    /// Current state; `None` before the first episode.
    fn state(&self) -> Option<&SimState>;
}
