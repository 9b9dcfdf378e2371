//! Synthetic scans shared by unit tests.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;
use std::sync::Arc;

use crate::dataset::{expand, DatasetRecord, InstructionItem};
use crate::env::NavEnvironment;
use crate::features::{FeatureStore, ProceduralFeatures};
use crate::geometry::Position3;
use crate::graph::{ConnectivityRecord, NavGraphIndex};
use crate::oracle::ShortestPathOracle;
use crate::simulator::{EnvBatch, GraphSimulator, Simulator, SimulatorConfig};
use crate::Id;

/// Builds records from `(id, position)` pairs and an undirected edge list.
pub fn records(nodes: &[(&str, Position3)], edges: &[(&str, &str)]) -> Vec<ConnectivityRecord> {
    let ids: Vec<&str> = nodes.iter().map(|(id, _)| *id).collect();
    nodes
        .iter()
        .map(|(id, pos)| {
            let unobstructed = ids
                .iter()
                .map(|other| {
                    edges
                        .iter()
                        .any(|(a, b)| (a == id && b == other) || (b == id && a == other))
                })
                .collect();
            ConnectivityRecord::at(*id, *pos, unobstructed)
        })
        .collect()
}

/// Scan `S`: `A - B - C` along +y, 1.0 apart.
pub fn line_records() -> Vec<ConnectivityRecord> {
    records(
        &[
            ("A", Position3::new(0.0, 0.0, 0.0)),
            ("B", Position3::new(0.0, 1.0, 0.0)),
            ("C", Position3::new(0.0, 2.0, 0.0)),
        ],
        &[("A", "B"), ("B", "C")],
    )
}

/// Scan `T`: an L-shaped corridor `P - Q - R - U` with a raised landing at `U`.
pub fn corner_records() -> Vec<ConnectivityRecord> {
    records(
        &[
            ("P", Position3::new(0.0, 0.0, 0.0)),
            ("Q", Position3::new(2.0, 0.0, 0.0)),
            ("R", Position3::new(2.0, -2.0, 0.0)),
            ("U", Position3::new(2.0, -3.0, 2.0)),
        ],
        &[("P", "Q"), ("Q", "R"), ("R", "U")],
    )
}

/// Index over scans `S` and `T`.
pub fn index() -> Arc<NavGraphIndex> {
    let mut by_scan = HashMap::new();
    by_scan.insert("S".to_string(), line_records());
    by_scan.insert("T".to_string(), corner_records());
    Arc::new(NavGraphIndex::from_connectivity(by_scan))
}

/// Procedural features (4 floats per id) over every viewpoint in `index`.
pub fn features(index: &NavGraphIndex) -> Arc<dyn FeatureStore> {
    let keys: HashMap<Id, HashSet<Id>> = index
        .scans()
        .map(|scan| {
            let vps: HashSet<Id> = index
                .graph(scan)
                .map(|g| g.viewpoints().map(|vp| vp.id.clone()).collect())
                .unwrap_or_default();
            (scan.to_string(), vps)
        })
        .collect();
    Arc::new(ProceduralFeatures::new(keys, 4))
}

/// `size` graph-backed sessions over `index`.
pub fn sims(index: Arc<NavGraphIndex>, size: usize) -> EnvBatch {
    let features = features(&index);
    EnvBatch::with_sessions(size, features, || {
        Box::new(GraphSimulator::new(index.clone(), SimulatorConfig::default())) as Box<dyn Simulator>
    })
}

/// Three reference paths, four instructions in total.
pub fn dataset() -> Vec<DatasetRecord> {
    let record = |path_id: u64, scan: &str, path: &[&str], heading: f64, n: usize| DatasetRecord {
        path_id,
        scan: scan.to_string(),
        path: path.iter().map(|s| s.to_string()).collect(),
        heading,
        instructions: (0..n).map(|j| format!("instruction {} of path {}", j, path_id)).collect(),
        distance: None,
    };
    vec![
        record(1, "S", &["A", "B", "C"], 0.0, 2),
        record(2, "S", &["C", "B"], PI, 1),
        record(3, "T", &["P", "Q", "R", "U"], 0.0, 1),
    ]
}

pub fn items() -> Vec<InstructionItem> {
    expand(&dataset(), None)
}

/// Environment over [`items`] with `batch_size` sessions.
pub fn env(batch_size: usize, seed: u64) -> NavEnvironment {
    let index = index();
    let sims = sims(index.clone(), batch_size);
    NavEnvironment::new(items(), sims, ShortestPathOracle::new(index), seed).unwrap()
}
