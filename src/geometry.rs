//! Positions and the discretized camera model.
//!
//! Headings are measured clockwise from the +y axis, in radians, and live in
//! `[0, 2π)`. Elevation is split into three tiers (down, level, up) and
//! heading into twelve 30° steps, giving 36 view indices.

use std::f64::consts::{PI, TAU};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of discrete heading steps in a full turn.
pub const HEADING_COUNT: usize = 12;

/// Number of discrete elevation tiers (0 = down, 1 = level, 2 = up).
pub const ELEVATION_TIERS: usize = 3;

/// Total number of discretized view directions.
pub const VIEW_COUNT: usize = HEADING_COUNT * ELEVATION_TIERS;

/// Size of one heading or elevation step (30°).
pub const ANGLE_INCREMENT: f64 = PI / 6.0;

/// A 3D position inside a scan.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance in the xy plane only.
    pub fn horizontal_distance_to(&self, other: &Position3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Component-wise difference `self - other`.
    pub fn sub(&self, other: &Position3) -> Position3 {
        Position3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl fmt::Display for Position3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Normalizes a heading to `[0, 2π)`.
pub fn normalize_heading(heading: f64) -> f64 {
    let h = heading.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if h >= TAU {
        0.0
    } else {
        h
    }
}

/// Wraps an angle difference to `(-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let a = normalize_heading(angle);
    if a > PI {
        a - TAU
    } else {
        a
    }
}

/// Absolute heading from `from` toward `to`, measured from the +y axis.
pub fn bearing(from: &Position3, to: &Position3) -> f64 {
    let delta = to.sub(from);
    normalize_heading(PI / 2.0 - delta.y.atan2(delta.x))
}

/// Index of the nearest discrete heading step for `heading`.
pub fn heading_step(heading: f64) -> usize {
    ((normalize_heading(heading) / ANGLE_INCREMENT).round() as usize) % HEADING_COUNT
}

/// Elevation tier (0, 1 or 2) for a level-relative elevation in radians.
pub fn elevation_tier_of(elevation: f64) -> usize {
    let tier = (elevation / ANGLE_INCREMENT).round() as i64 + 1;
    tier.clamp(0, ELEVATION_TIERS as i64 - 1) as usize
}

/// Elevation tier encoded in a view index.
pub fn elevation_tier(view_index: usize) -> usize {
    view_index / HEADING_COUNT
}

/// View index for a discretized heading and elevation.
pub fn view_index(heading: f64, elevation: f64) -> usize {
    elevation_tier_of(elevation) * HEADING_COUNT + heading_step(heading)
}
