//! Render-free simulator over the navigation graph.
//!
//! Camera angles are discretized (12 headings, 3 elevation tiers). A
//! neighbouring viewpoint is navigable when its horizontal bearing falls
//! inside the camera's horizontal field of view.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::error::SimulatorError;
use super::session::Simulator;
use super::state::{NavigableCandidate, SimState};
use crate::geometry::{
    bearing, heading_step, normalize_heading, view_index, wrap_angle, ANGLE_INCREMENT,
};
use crate::graph::NavGraphIndex;

/// Camera parameters of the graph-backed simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Image width in pixels.
    pub image_w: u32,
    /// Image height in pixels.
    pub image_h: u32,
    /// Vertical field of view in degrees.
    pub vfov: f64,
}

impl SimulatorConfig {
    /// Horizontal field of view in radians.
    pub fn hfov(&self) -> f64 {
        (self.vfov * self.image_w as f64 / self.image_h as f64).to_radians()
    }

    pub fn min_elevation(&self) -> f64 {
        -ANGLE_INCREMENT
    }

    pub fn max_elevation(&self) -> f64 {
        ANGLE_INCREMENT
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            image_w: 640,
            image_h: 480,
            vfov: 60.0,
        }
    }
}

/// Discretized simulator session backed by a shared [`NavGraphIndex`].
#[derive(Debug, Clone)]
pub struct GraphSimulator {
    index: Arc<NavGraphIndex>,
    config: SimulatorConfig,
    state: Option<SimState>,
}

impl GraphSimulator {
    pub fn new(index: Arc<NavGraphIndex>, config: SimulatorConfig) -> Self {
        Self {
            index,
            config,
            state: None,
        }
    }

    fn snap_heading(heading: f64) -> f64 {
        heading_step(heading) as f64 * ANGLE_INCREMENT
    }

    fn snap_elevation(&self, elevation: f64) -> f64 {
        let clamped = elevation.clamp(self.config.min_elevation(), self.config.max_elevation());
        (clamped / ANGLE_INCREMENT).round() * ANGLE_INCREMENT
    }

    /// Builds the full state at `viewpoint`, recomputing navigable candidates.
    fn build_state(
        &self,
        scan: &str,
        viewpoint: &str,
        heading: f64,
        elevation: f64,
        step: usize,
    ) -> Result<SimState, SimulatorError> {
        let position = self.index.position(scan, viewpoint)?;
        let half_hfov = self.config.hfov() / 2.0;

        let mut visible: Vec<(f64, NavigableCandidate)> = self
            .index
            .neighbors(scan, viewpoint)?
            .into_iter()
            .filter_map(|(vp, _)| {
                let rel_heading = wrap_angle(bearing(&position, &vp.position) - heading);
                if rel_heading.abs() > half_hfov {
                    return None;
                }
                let horizontal = position.horizontal_distance_to(&vp.position);
                let rel_elevation = (vp.position.z - position.z).atan2(horizontal) - elevation;
                Some((
                    position.distance_to(&vp.position),
                    NavigableCandidate {
                        viewpoint: vp.id.clone(),
                        rel_heading,
                        rel_elevation,
                        point: vp.position,
                    },
                ))
            })
            .collect();
        visible.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut navigable = Vec::with_capacity(visible.len() + 1);
        navigable.push(NavigableCandidate {
            viewpoint: viewpoint.to_string(),
            rel_heading: 0.0,
            rel_elevation: 0.0,
            point: position,
        });
        navigable.extend(visible.into_iter().map(|(_, c)| c));

        Ok(SimState {
            scan: scan.to_string(),
            viewpoint: viewpoint.to_string(),
            position,
            heading,
            elevation,
            view_index: view_index(heading, elevation),
            step,
            navigable,
        })
    }
}

impl Simulator for GraphSimulator {
    fn new_episode(
        &mut self,
        scan: &str,
        viewpoint: &str,
        heading: f64,
        elevation: f64,
    ) -> Result<(), SimulatorError> {
        let heading = Self::snap_heading(heading);
        let elevation = self.snap_elevation(elevation);
        self.state = Some(self.build_state(scan, viewpoint, heading, elevation, 0)?);
        Ok(())
    }

    fn check_start(&self, scan: &str, viewpoint: &str) -> Result<(), SimulatorError> {
        self.index.position(scan, viewpoint)?;
        Ok(())
    }

    fn make_action(&mut self, action: Action) -> Result<(), SimulatorError> {
        let state = self.state.as_ref().ok_or(SimulatorError::NotStarted(0))?;
        let target = state
            .navigable
            .get(action.index)
            .ok_or(SimulatorError::InvalidCandidate {
                index: action.index,
                available: state.navigable.len(),
            })?;

        let heading = normalize_heading(state.heading + action.heading as f64 * ANGLE_INCREMENT);
        let heading = Self::snap_heading(heading);
        let elevation = self.snap_elevation(state.elevation + action.elevation as f64 * ANGLE_INCREMENT);
        let next = self.build_state(
            &state.scan,
            &target.viewpoint,
            heading,
            elevation,
            state.step + 1,
        )?;
        self.state = Some(next);
        Ok(())
    }

    fn state(&self) -> Option<&SimState> {
        self.state.as_ref()
    }
}
