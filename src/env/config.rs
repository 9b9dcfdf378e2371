//! Configuration for the navigation environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::features::FeatureSource;
use crate::simulator::SimulatorConfig;

/// Configuration for [`NavEnvironment::from_config`](super::NavEnvironment::from_config).
///
/// Deserializable from JSON; missing fields take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Number of lockstep simulator sessions.
    pub batch_size: usize,
    /// Seed for the dataset shuffle.
    pub seed: u64,
    /// Named dataset splits, loaded from `{data_dir}/R2R_{split}.json`.
    pub splits: Vec<String>,
    pub data_dir: PathBuf,
    /// Directory holding `{scan}_connectivity.json` files.
    pub connectivity_dir: PathBuf,
    pub features: FeatureSource,
    pub simulator: SimulatorConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            seed: 10,
            splits: vec!["train".to_string()],
            data_dir: PathBuf::from("tasks/R2R/data"),
            connectivity_dir: PathBuf::from("connectivity"),
            features: FeatureSource::Precomputed {
                path: PathBuf::from("img_features/ResNet-152-imagenet.tsv"),
            },
            simulator: SimulatorConfig::default(),
        }
    }
}
