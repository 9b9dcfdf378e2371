use std::collections::HashMap;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::info;

use super::connectivity::{load_connectivity, ConnectivityRecord};
use super::error::GraphError;
use super::nav_graph::{NavGraph, Viewpoint};
use super::shortest_paths::ShortestPaths;
use crate::geometry::Position3;
use crate::Id;

/// Graph and precomputed tables of one scan.
#[derive(Debug, Clone)]
struct ScanIndex {
    graph: NavGraph,
    paths: ShortestPaths,
}

impl ScanIndex {
    fn build(graph: NavGraph) -> Self {
        let paths = ShortestPaths::compute(&graph);
        Self { graph, paths }
    }
}

/// Read-only index of navigation graphs and all-pairs shortest paths.
///
/// Built once at environment construction and shared (typically behind an
/// `Arc`) by the simulator, the teacher oracle and the evaluator.
#[derive(Debug, Clone, Default)]
pub struct NavGraphIndex {
    scans: HashMap<Id, ScanIndex>,
}

impl NavGraphIndex {
    /// Loads `{dir}/{scan}_connectivity.json` for every scan and precomputes
    /// its shortest-path tables.
    pub fn load<I, S>(dir: &Path, scans: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_scan = HashMap::new();
        for scan in scans {
            let scan = scan.as_ref();
            if !by_scan.contains_key(scan) {
                by_scan.insert(scan.to_string(), load_connectivity(dir, scan)?);
            }
        }
        info!("Loading navigation graphs for {} scans", by_scan.len());
        Ok(Self::from_connectivity(by_scan))
    }

    /// Builds the index from in-memory connectivity records keyed by scan.
    pub fn from_connectivity(by_scan: HashMap<Id, Vec<ConnectivityRecord>>) -> Self {
        let graphs = by_scan
            .into_iter()
            .map(|(scan, records)| NavGraph::from_connectivity(scan, &records))
            .collect();
        Self::from_graphs(graphs)
    }

    /// Precomputes tables for already-built graphs.
    pub fn from_graphs(graphs: Vec<NavGraph>) -> Self {
        #[cfg(feature = "parallel")]
        let built: Vec<ScanIndex> = graphs.into_par_iter().map(ScanIndex::build).collect();
        #[cfg(not(feature = "parallel"))]
        let built: Vec<ScanIndex> = graphs.into_iter().map(ScanIndex::build).collect();

        let scans = built
            .into_iter()
            .map(|s| (s.graph.scan().to_string(), s))
            .collect::<HashMap<_, _>>();
        info!(
            "Precomputed shortest paths for {} scans ({} viewpoints)",
            scans.len(),
            scans.values().map(|s| s.graph.node_count()).sum::<usize>()
        );
        Self { scans }
    }

    fn scan(&self, scan: &str) -> Result<&ScanIndex, GraphError> {
        self.scans
            .get(scan)
            .ok_or_else(|| GraphError::UnknownScan(scan.to_string()))
    }

    fn check_viewpoint(&self, index: &ScanIndex, scan: &str, vp: &str) -> Result<(), GraphError> {
        if index.paths.contains(vp) {
            Ok(())
        } else {
            Err(GraphError::unknown_viewpoint(scan, vp))
        }
    }

    /// Shortest path from `from` to `to`, both endpoints included.
    pub fn shortest_path(&self, scan: &str, from: &str, to: &str) -> Result<&[Id], GraphError> {
        let index = self.scan(scan)?;
        self.check_viewpoint(index, scan, from)?;
        self.check_viewpoint(index, scan, to)?;
        index.paths.path(from, to).ok_or_else(|| GraphError::Unreachable {
            scan: scan.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Shortest-path distance between two viewpoints.
    pub fn distance(&self, scan: &str, from: &str, to: &str) -> Result<f64, GraphError> {
        let index = self.scan(scan)?;
        self.check_viewpoint(index, scan, from)?;
        self.check_viewpoint(index, scan, to)?;
        index.paths.distance(from, to).ok_or_else(|| GraphError::Unreachable {
            scan: scan.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Position of a viewpoint.
    pub fn position(&self, scan: &str, viewpoint: &str) -> Result<Position3, GraphError> {
        self.scan(scan)?
            .graph
            .position(viewpoint)
            .ok_or_else(|| GraphError::unknown_viewpoint(scan, viewpoint))
    }

    /// Directly connected viewpoints with their edge weights.
    pub fn neighbors(&self, scan: &str, viewpoint: &str) -> Result<Vec<(&Viewpoint, f64)>, GraphError> {
        let index = self.scan(scan)?;
        self.check_viewpoint(index, scan, viewpoint)?;
        Ok(index.graph.neighbors(viewpoint))
    }

    pub fn graph(&self, scan: &str) -> Result<&NavGraph, GraphError> {
        Ok(&self.scan(scan)?.graph)
    }

    pub fn contains(&self, scan: &str, viewpoint: &str) -> bool {
        self.scans
            .get(scan)
            .is_some_and(|s| s.paths.contains(viewpoint))
    }

    /// Scan ids held by the index.
    pub fn scans(&self) -> impl Iterator<Item = &str> {
        self.scans.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.scans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }
}
