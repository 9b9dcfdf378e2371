//! Shortest-path teacher.
//!
//! A look-then-move controller under the discretized camera: the next
//! viewpoint on the shortest path must be heading- and elevation-aligned
//! within one 30° step before the teacher emits a move onto it.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::geometry::{bearing, ELEVATION_TIERS};
use crate::graph::{GraphError, NavGraphIndex};
use crate::simulator::{Action, SimState};

/// Alignment tolerance for heading and elevation (π/6).
pub const ALIGN_THRESHOLD: f64 = PI / 6.0;

/// Computes the next teacher action toward a goal viewpoint.
///
/// Stateless between calls; reads only the shared graph index.
#[derive(Debug, Clone)]
pub struct ShortestPathOracle {
    index: Arc<NavGraphIndex>,
}

impl ShortestPathOracle {
    pub fn new(index: Arc<NavGraphIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &Arc<NavGraphIndex> {
        &self.index
    }

    /// Next discrete action on the shortest path from `state` to `goal`.
    ///
    /// Priority order:
    /// 1. at the goal: no-op
    /// 2. next viewpoint visible: turn toward it, then tilt toward it, then move
    /// 3. not visible and gaze not level: tilt back to the middle tier
    /// 4. otherwise: turn along the shorter arc toward its bearing
    pub fn teacher_action(&self, state: &SimState, goal: &str) -> Result<Action, GraphError> {
        if state.viewpoint == goal {
            return Ok(Action::NOOP);
        }
        let path = self.index.shortest_path(&state.scan, &state.viewpoint, goal)?;
        let Some(next) = path.get(1) else {
            return Ok(Action::NOOP);
        };

        let tier = state.elevation_tier();
        if let Some(i) = state.candidate_index(next) {
            let candidate = &state.navigable[i];
            return Ok(if candidate.rel_heading > ALIGN_THRESHOLD {
                Action::TURN_RIGHT
            } else if candidate.rel_heading < -ALIGN_THRESHOLD {
                Action::TURN_LEFT
            } else if candidate.rel_elevation > ALIGN_THRESHOLD && tier < ELEVATION_TIERS - 1 {
                Action::LOOK_UP
            } else if candidate.rel_elevation < -ALIGN_THRESHOLD && tier > 0 {
                Action::LOOK_DOWN
            } else {
                Action::move_to(i)
            });
        }

        // Visibility assumes a level gaze.
        if tier == 0 {
            return Ok(Action::LOOK_UP);
        }
        if tier == ELEVATION_TIERS - 1 {
            return Ok(Action::LOOK_DOWN);
        }

        let target = bearing(&state.position, &self.index.position(&state.scan, next)?);
        let heading = state.heading;
        if (heading > target && heading - target < PI) || (target > heading && target - heading > PI) {
            Ok(Action::TURN_LEFT)
        } else {
            Ok(Action::TURN_RIGHT)
        }
    }
}
