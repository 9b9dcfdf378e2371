//! Lockstep batch of simulator sessions.

use std::sync::Arc;

use tracing::debug;

use super::action::{Action, SimpleAction};
use super::error::SimulatorError;
use super::session::Simulator;
use super::state::SimState;
use crate::features::FeatureStore;

/// `B` independent simulator sessions advanced together.
///
/// Every batched call takes exactly one argument per slot and applies them
/// slot by slot; slots never interact. Features are attached to raw states
/// through the shared [`FeatureStore`], whichever strategy it implements.
pub struct EnvBatch {
    sims: Vec<Box<dyn Simulator>>,
    features: Arc<dyn FeatureStore>,
}

impl EnvBatch {
    pub fn new(sims: Vec<Box<dyn Simulator>>, features: Arc<dyn FeatureStore>) -> Self {
        Self { sims, features }
    }

    /// Builds `batch_size` sessions with `make_sim`.
    pub fn with_sessions<F>(batch_size: usize, features: Arc<dyn FeatureStore>, mut make_sim: F) -> Self
    where
        F: FnMut() -> Box<dyn Simulator>,
    {
        let sims = (0..batch_size).map(|_| make_sim()).collect();
        Self::new(sims, features)
    }

    pub fn batch_size(&self) -> usize {
        self.sims.len()
    }

    pub fn features(&self) -> &Arc<dyn FeatureStore> {
        &self.features
    }

    fn check_len(&self, actual: usize) -> Result<(), SimulatorError> {
        if actual == self.sims.len() {
            Ok(())
        } else {
            Err(SimulatorError::BatchSizeMismatch {
                expected: self.sims.len(),
                actual,
            })
        }
    }

    /// Starts a new episode in every session, level gaze.
    ///
    /// Every start is checked before any session is reset, so a failure
    /// leaves all sessions as they were.
    pub fn new_episodes<S: AsRef<str>, V: AsRef<str>>(
        &mut self,
        scans: &[S],
        viewpoints: &[V],
        headings: &[f64],
    ) -> Result<(), SimulatorError> {
        self.check_len(scans.len())?;
        self.check_len(viewpoints.len())?;
        self.check_len(headings.len())?;
        for (i, sim) in self.sims.iter().enumerate() {
            sim.check_start(scans[i].as_ref(), viewpoints[i].as_ref())?;
        }
        for (i, sim) in self.sims.iter_mut().enumerate() {
            sim.new_episode(scans[i].as_ref(), viewpoints[i].as_ref(), headings[i], 0.0)?;
        }
        debug!("Started {} episodes", self.sims.len());
        Ok(())
    }

    /// Current state of every session paired with its view feature.
    pub fn get_states(&self) -> Result<Vec<(Vec<f32>, SimState)>, SimulatorError> {
        self.sims
            .iter()
            .enumerate()
            .map(|(i, sim)| {
                let state = sim.state().ok_or(SimulatorError::NotStarted(i))?;
                let feature = self
                    .features
                    .get(&state.scan, &state.viewpoint, state.view_index)?;
                Ok((feature, state.clone()))
            })
            .collect()
    }

    /// Applies one full action per session.
    ///
    /// All actions are checked before any session moves.
    pub fn make_actions(&mut self, actions: &[Action]) -> Result<(), SimulatorError> {
        self.check_len(actions.len())?;
        for (i, (sim, action)) in self.sims.iter().zip(actions).enumerate() {
            if sim.state().is_none() {
                return Err(SimulatorError::NotStarted(i));
            }
            sim.check_action(*action)?;
        }
        for (sim, action) in self.sims.iter_mut().zip(actions) {
            sim.make_action(*action)?;
        }
        Ok(())
    }

    /// Applies one simple action code per session.
    ///
    /// Codes: 0 forward, 1 turn left, 2 turn right, 3 look up, 4 look down.
    /// All codes are validated before any session moves. `Forward` with no
    /// candidate in view leaves that session untouched.
    pub fn make_simple_actions(&mut self, codes: &[usize]) -> Result<(), SimulatorError> {
        self.check_len(codes.len())?;
        let simple = codes
            .iter()
            .map(|&c| SimpleAction::try_from(c))
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(i) = self.sims.iter().position(|sim| sim.state().is_none()) {
            return Err(SimulatorError::NotStarted(i));
        }

        for (i, (sim, action)) in self.sims.iter_mut().zip(simple).enumerate() {
            if action == SimpleAction::Forward {
                let available = sim.state().ok_or(SimulatorError::NotStarted(i))?.navigable.len();
                if available < 2 {
                    continue;
                }
            }
            sim.make_action(action.into())?;
        }
        Ok(())
    }
}
