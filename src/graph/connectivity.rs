//! Connectivity files: `{scan}_connectivity.json`.
//!
//! Each file is a JSON array with one record per panorama. The camera pose is
//! a row-major 4x4 matrix whose translation column holds the viewpoint position.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::GraphError;
use crate::geometry::Position3;
use crate::Id;

/// One viewpoint entry of a connectivity file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityRecord {
    pub image_id: Id,
    pub pose: Vec<f64>,
    pub included: bool,
    pub unobstructed: Vec<bool>,
}

impl ConnectivityRecord {
    /// Builds a record positioned at `position` with an identity rotation.
    pub fn at(image_id: impl Into<Id>, position: Position3, unobstructed: Vec<bool>) -> Self {
        let p = position;
        Self {
            image_id: image_id.into(),
            pose: vec![
                1.0, 0.0, 0.0, p.x, //
                0.0, 1.0, 0.0, p.y, //
                0.0, 0.0, 1.0, p.z, //
                0.0, 0.0, 0.0, 1.0,
            ],
            included: true,
            unobstructed,
        }
    }

    /// Translation component of the pose.
    ///
    /// Poses shorter than 12 entries yield the origin.
    pub fn position(&self) -> Position3 {
        match (self.pose.get(3), self.pose.get(7), self.pose.get(11)) {
            (Some(&x), Some(&y), Some(&z)) => Position3::new(x, y, z),
            _ => Position3::default(),
        }
    }

    /// Whether this viewpoint has a clear line of sight to record `j`.
    pub fn sees(&self, j: usize) -> bool {
        self.unobstructed.get(j).copied().unwrap_or(false)
    }
}

/// Path of the connectivity file for `scan` under `dir`.
pub fn connectivity_path(dir: &Path, scan: &str) -> PathBuf {
    dir.join(format!("{}_connectivity.json", scan))
}

/// Reads and parses the connectivity file for one scan.
pub fn load_connectivity(dir: &Path, scan: &str) -> Result<Vec<ConnectivityRecord>, GraphError> {
    let path = connectivity_path(dir, scan);
    let text = fs::read_to_string(&path).map_err(|source| GraphError::Io {
        scan: scan.to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| GraphError::Parse {
        scan: scan.to_string(),
        source,
    })
}
