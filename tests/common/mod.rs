//! On-disk fixture: one small house scan, a dataset split and a feature table.

#![allow(dead_code)]

use std::f64::consts::PI;
use std::fs;
use std::path::PathBuf;

use r2rnav::dataset::DatasetRecord;
use r2rnav::env::EnvConfig;
use r2rnav::eval::EvalConfig;
use r2rnav::features::precomputed::{encode_row, FeatureRow};
use r2rnav::features::FeatureSource;
use r2rnav::geometry::{Position3, VIEW_COUNT};
use r2rnav::graph::ConnectivityRecord;
use tempfile::TempDir;

pub const SCAN: &str = "house";
pub const SPLIT: &str = "val_seen";
pub const FEATURE_DIM: usize = 4;

/// Viewpoints of the house. `x` is excluded from the graph.
pub const VIEWPOINTS: [(&str, [f64; 3]); 6] = [
    ("a", [0.0, 0.0, 0.0]),
    ("b", [0.0, 2.0, 0.0]),
    ("c", [2.0, 2.0, 0.0]),
    ("d", [2.0, 4.0, 0.5]),
    ("e", [4.0, 4.0, 0.0]),
    ("x", [9.0, 9.0, 0.0]),
];

pub const EDGES: [(&str, &str); 6] = [
    ("a", "b"),
    ("b", "c"),
    ("c", "d"),
    ("d", "e"),
    ("b", "d"),
    ("e", "x"),
];

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(format!("{}_connectivity.json", SCAN)), connectivity_json()).unwrap();
        fs::write(
            dir.path().join(format!("R2R_{}.json", SPLIT)),
            serde_json::to_string_pretty(&dataset()).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("features.tsv"), features_tsv()).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn env_config(&self, batch_size: usize) -> EnvConfig {
        EnvConfig {
            batch_size,
            seed: 3,
            splits: vec![SPLIT.to_string()],
            data_dir: self.path(),
            connectivity_dir: self.path(),
            features: FeatureSource::Precomputed {
                path: self.path().join("features.tsv"),
            },
            ..EnvConfig::default()
        }
    }

    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            splits: vec![SPLIT.to_string()],
            data_dir: self.path(),
            connectivity_dir: self.path(),
            ..EvalConfig::default()
        }
    }
}

fn connectivity_json() -> String {
    let ids: Vec<&str> = VIEWPOINTS.iter().map(|(id, _)| *id).collect();
    let records: Vec<ConnectivityRecord> = VIEWPOINTS
        .iter()
        .map(|(id, [x, y, z])| {
            let unobstructed = ids
                .iter()
                .map(|other| EDGES.iter().any(|(p, q)| (p == id && q == other) || (q == id && p == other)))
                .collect();
            let mut record = ConnectivityRecord::at(*id, Position3::new(*x, *y, *z), unobstructed);
            record.included = *id != "x";
            record
        })
        .collect();
    serde_json::to_string(&records).unwrap()
}

pub fn dataset() -> Vec<DatasetRecord> {
    let record = |path_id: u64, path: &[&str], heading: f64, instructions: &[&str]| DatasetRecord {
        path_id,
        scan: SCAN.to_string(),
        path: path.iter().map(|s| s.to_string()).collect(),
        heading,
        instructions: instructions.iter().map(|s| s.to_string()).collect(),
        distance: None,
    };
    vec![
        record(
            10,
            &["a", "b", "d", "e"],
            0.0,
            &["Walk ahead, then take the stairs.", "Go up to the landing and on to the far room."],
        ),
        record(11, &["e", "d"], PI, &["Step back onto the landing."]),
        record(12, &["c", "b", "a"], 1.0, &["Head west and then south to the door."]),
    ]
}

/// One row per included viewpoint; every value of view `v` equals `v`.
fn features_tsv() -> String {
    VIEWPOINTS
        .iter()
        .filter(|(id, _)| *id != "x")
        .map(|(id, _)| {
            let row = FeatureRow {
                scan: SCAN.to_string(),
                viewpoint: id.to_string(),
                image_w: 640,
                image_h: 480,
                vfov: 60,
                values: (0..VIEW_COUNT * FEATURE_DIM)
                    .map(|i| (i / FEATURE_DIM) as f32)
                    .collect(),
            };
            encode_row(&row) + "\n"
        })
        .collect()
}
