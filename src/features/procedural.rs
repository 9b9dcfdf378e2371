//! Deterministic pseudo-random features for ablation runs.
//!
//! Every scan id and every viewpoint id gets its own `[36, D]` table seeded by
//! a stable hash of the id. A lookup concatenates the scan row and the
//! viewpoint row, so visual content carries no information while each
//! location still has a consistent fingerprint across episodes and processes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use super::error::FeatureError;
use super::{check_view_index, FeatureStore};
use crate::geometry::VIEW_COUNT;
use crate::Id;

/// Default per-id width; lookups return twice this.
pub const DEFAULT_ID_DIM: usize = 1024;

/// Stable 64-bit seed for an id (first 8 bytes of its MD5 digest).
pub fn stable_seed(id: &str) -> u64 {
    let digest = md5::compute(id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.0[..8]);
    u64::from_le_bytes(bytes)
}

/// Generates the `[36, dim]` table for one id: `max(0, 0.5 z + 0.3)`, `z ~ N(0, 1)`.
pub fn fingerprint(id: &str, dim: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(stable_seed(id));
    (0..VIEW_COUNT * dim)
        .map(|_| {
            let z: f32 = StandardNormal.sample(&mut rng);
            (0.5 * z + 0.3).max(0.0)
        })
        .collect()
}

/// Feature store of per-id fingerprints over a fixed key set.
#[derive(Debug, Clone)]
pub struct ProceduralFeatures {
    keys: HashMap<Id, HashSet<Id>>,
    by_scan: HashMap<Id, Arc<Vec<f32>>>,
    by_viewpoint: HashMap<Id, Arc<Vec<f32>>>,
    id_dim: usize,
}

impl ProceduralFeatures {
    /// Generates fingerprints for every scan and viewpoint in `keys`.
    ///
    /// Viewpoint ids shared by several scans share one fingerprint.
    pub fn new(keys: HashMap<Id, HashSet<Id>>, id_dim: usize) -> Self {
        let mut by_scan = HashMap::new();
        let mut by_viewpoint = HashMap::new();
        for (scan, viewpoints) in &keys {
            by_scan
                .entry(scan.clone())
                .or_insert_with(|| Arc::new(fingerprint(scan, id_dim)));
            for vp in viewpoints {
                by_viewpoint
                    .entry(vp.clone())
                    .or_insert_with(|| Arc::new(fingerprint(vp, id_dim)));
            }
        }
        Self {
            keys,
            by_scan,
            by_viewpoint,
            id_dim,
        }
    }
}

impl FeatureStore for ProceduralFeatures {
    fn get(&self, scan: &str, viewpoint: &str, view_index: usize) -> Result<Vec<f32>, FeatureError> {
        check_view_index(view_index)?;
        if !self.keys.get(scan).is_some_and(|vps| vps.contains(viewpoint)) {
            return Err(FeatureError::not_found(scan, viewpoint));
        }
        let (Some(scan_feats), Some(vp_feats)) = (self.by_scan.get(scan), self.by_viewpoint.get(viewpoint))
        else {
            return Err(FeatureError::not_found(scan, viewpoint));
        };
        let range = view_index * self.id_dim..(view_index + 1) * self.id_dim;
        let mut out = Vec::with_capacity(2 * self.id_dim);
        out.extend_from_slice(&scan_feats[range.clone()]);
        out.extend_from_slice(&vp_feats[range]);
        Ok(out)
    }

    fn feature_dim(&self) -> usize {
        2 * self.id_dim
    }

    fn name(&self) -> &str {
        "procedural"
    }
}
