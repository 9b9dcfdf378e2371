use serde::{Deserialize, Serialize};

use crate::geometry::{elevation_tier, Position3};
use crate::Id;

/// A viewpoint reachable in one move from the current location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigableCandidate {
    pub viewpoint: Id,
    /// Heading of the candidate relative to the camera, in `(-π, π]`.
    pub rel_heading: f64,
    /// Elevation of the candidate relative to the camera.
    pub rel_elevation: f64,
    pub point: Position3,
}

/// Authoritative state of one simulator session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub scan: Id,
    pub viewpoint: Id,
    pub position: Position3,
    /// Camera heading in `[0, 2π)`.
    pub heading: f64,
    pub elevation: f64,
    /// Discretized view, `tier * 12 + heading step`.
    pub view_index: usize,
    /// Number of actions taken this episode.
    pub step: usize,
    /// `navigable[0]` is always the current viewpoint.
    pub navigable: Vec<NavigableCandidate>,
}

impl SimState {
    /// Elevation tier of the current view (0 down, 1 level, 2 up).
    pub fn elevation_tier(&self) -> usize {
        elevation_tier(self.view_index)
    }

    /// Index of `viewpoint` among the navigable candidates.
    pub fn candidate_index(&self, viewpoint: &str) -> Option<usize> {
        self.navigable.iter().position(|c| c.viewpoint == viewpoint)
    }
}
