//! Image features per (scan, viewpoint, view index).
//!
//! Three interchangeable strategies sit behind the [`FeatureStore`] trait:
//!
//! - [`PrecomputedFeatures`]: a TSV table of base64 `f32` rows held in memory
//! - [`ProceduralFeatures`]: deterministic per-id pseudo-random fingerprints
//! - [`OnDemandFeatures`]: per-viewpoint `.npy` arrays read lazily through a memory map
//!
//! The strategy is chosen once, at construction, from a [`FeatureSource`].

pub mod error;
pub mod on_demand;
pub mod precomputed;
pub mod procedural;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use error::FeatureError;
pub use on_demand::OnDemandFeatures;
pub use precomputed::PrecomputedFeatures;
pub use procedural::ProceduralFeatures;

/// Lookup of a fixed-width feature vector for one discretized view.
pub trait FeatureStore: Send + Sync {
    /// Returns the feature vector of `view_index` at `(scan, viewpoint)`.
    fn get(&self, scan: &str, viewpoint: &str, view_index: usize) -> Result<Vec<f32>, FeatureError>;

    /// Width of every vector returned by [`get`](Self::get).
    fn feature_dim(&self) -> usize;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// Selects and configures a feature strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSource {
    /// TSV table with base64-encoded `[36 x D]` float rows.
    Precomputed { path: PathBuf },
    /// Fingerprints for every key listed in the TSV table at `path`.
    Procedural { path: PathBuf, dim: usize },
    /// `{dir}/{scan}/{viewpoint}.npy` arrays with `row_width` floats per view.
    OnDemand { dir: PathBuf, row_width: usize },
}

impl FeatureSource {
    /// Builds the configured store.
    pub fn build(&self) -> Result<Box<dyn FeatureStore>, FeatureError> {
        let store: Box<dyn FeatureStore> = match self {
            FeatureSource::Precomputed { path } => Box::new(PrecomputedFeatures::load(path)?),
            FeatureSource::Procedural { path, dim } => {
                let keys = precomputed::read_keys(path)?;
                Box::new(ProceduralFeatures::new(keys, *dim))
            }
            FeatureSource::OnDemand { dir, row_width } => {
                Box::new(OnDemandFeatures::new(dir.clone(), *row_width))
            }
        };
        tracing::info!(
            "Using {} image features (dim {})",
            store.name(),
            store.feature_dim()
        );
        Ok(store)
    }
}

pub(crate) fn check_view_index(index: usize) -> Result<(), FeatureError> {
    if index < crate::geometry::VIEW_COUNT {
        Ok(())
    } else {
        Err(FeatureError::ViewIndexOutOfRange {
            index,
            views: crate::geometry::VIEW_COUNT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_deserializes_from_tagged_json() {
        let src: FeatureSource =
            serde_json::from_str(r#"{"kind": "on_demand", "dir": "img", "row_width": 8}"#).unwrap();
        assert_eq!(
            src,
            FeatureSource::OnDemand {
                dir: PathBuf::from("img"),
                row_width: 8
            }
        );
    }

    #[test]
    fn view_index_bounds() {
        assert!(check_view_index(35).is_ok());
        assert!(matches!(
            check_view_index(36),
            Err(FeatureError::ViewIndexOutOfRange { index: 36, views: 36 })
        ));
    }
}
