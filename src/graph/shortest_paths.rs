//! All-pairs shortest paths by repeated single-source Dijkstra.
//!
//! Tables are computed once per scan so that per-step oracle queries are
//! plain map lookups.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use super::nav_graph::NavGraph;
use crate::Id;

/// Result of one single-source Dijkstra run, indexed by node.
#[derive(Debug, Clone)]
pub struct SingleSource {
    pub dist: Vec<Option<f64>>,
    pub prev: Vec<Option<NodeIndex>>,
}

/// Dijkstra from `source` over the whole graph.
pub fn dijkstra_from(graph: &NavGraph, source: NodeIndex) -> SingleSource {
    let g = graph.inner();
    let n = g.node_count();
    let mut dist: Vec<Option<f64>> = vec![None; n];
    let mut prev: Vec<Option<NodeIndex>> = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[source.index()] = Some(0.0);
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(d), node))) = heap.pop() {
        if dist[node.index()].is_some_and(|best| d > best) {
            continue;
        }
        for edge in g.edges(node) {
            let next = if edge.source() == node { edge.target() } else { edge.source() };
            let candidate = d + *edge.weight();
            if dist[next.index()].map_or(true, |best| candidate < best) {
                dist[next.index()] = Some(candidate);
                prev[next.index()] = Some(node);
                heap.push(Reverse((OrderedFloat(candidate), next)));
            }
        }
    }

    SingleSource { dist, prev }
}

/// Precomputed shortest paths and distances for one scan.
///
/// # Invariants
///
/// - `distance(a, b) == distance(b, a)`
/// - `path(a, b)` starts at `a`, ends at `b`, and its summed edge weight
///   equals `distance(a, b)`
/// - Unreachable pairs are absent from both tables
#[derive(Debug, Clone, Default)]
pub struct ShortestPaths {
    paths: HashMap<Id, HashMap<Id, Vec<Id>>>,
    distances: HashMap<Id, HashMap<Id, f64>>,
}

impl ShortestPaths {
    /// Runs Dijkstra from every node of `graph`.
    pub fn compute(graph: &NavGraph) -> Self {
        let g = graph.inner();
        let mut paths = HashMap::with_capacity(g.node_count());
        let mut distances = HashMap::with_capacity(g.node_count());

        for source in g.node_indices() {
            let result = dijkstra_from(graph, source);
            let mut row_paths = HashMap::new();
            let mut row_dist = HashMap::new();

            for target in g.node_indices() {
                let Some(d) = result.dist[target.index()] else { continue };
                let mut path = vec![g[target].id.clone()];
                let mut cursor = target;
                while let Some(p) = result.prev[cursor.index()] {
                    path.push(g[p].id.clone());
                    cursor = p;
                }
                path.reverse();
                row_paths.insert(g[target].id.clone(), path);
                row_dist.insert(g[target].id.clone(), d);
            }

            paths.insert(g[source].id.clone(), row_paths);
            distances.insert(g[source].id.clone(), row_dist);
        }

        Self { paths, distances }
    }

    pub fn path(&self, from: &str, to: &str) -> Option<&[Id]> {
        self.paths.get(from)?.get(to).map(|p| p.as_slice())
    }

    pub fn distance(&self, from: &str, to: &str) -> Option<f64> {
        self.distances.get(from)?.get(to).copied()
    }

    /// Whether `viewpoint` is a source row of the tables.
    pub fn contains(&self, viewpoint: &str) -> bool {
        self.distances.contains_key(viewpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position3;
    use crate::graph::connectivity::ConnectivityRecord;

    /// a - b - c in a line plus a long detour a - d - c.
    fn diamond() -> NavGraph {
        let recs = vec![
            ConnectivityRecord::at("a", Position3::new(0.0, 0.0, 0.0), vec![false, true, false, true]),
            ConnectivityRecord::at("b", Position3::new(1.0, 0.0, 0.0), vec![true, false, true, false]),
            ConnectivityRecord::at("c", Position3::new(2.0, 0.0, 0.0), vec![false, true, false, true]),
            ConnectivityRecord::at("d", Position3::new(1.0, 3.0, 0.0), vec![true, false, true, false]),
        ];
        NavGraph::from_connectivity("S", &recs)
    }

    #[test]
    fn picks_the_short_branch() {
        let sp = ShortestPaths::compute(&diamond());
        assert_eq!(sp.path("a", "c").unwrap(), ["a", "b", "c"]);
        assert!((sp.distance("a", "c").unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn self_path_is_single_node() {
        let sp = ShortestPaths::compute(&diamond());
        assert_eq!(sp.path("d", "d").unwrap(), ["d"]);
        assert_eq!(sp.distance("d", "d"), Some(0.0));
    }

    #[test]
    fn disconnected_pairs_are_absent() {
        let recs = vec![
            ConnectivityRecord::at("a", Position3::new(0.0, 0.0, 0.0), vec![false, false]),
            ConnectivityRecord::at("b", Position3::new(1.0, 0.0, 0.0), vec![false, false]),
        ];
        let sp = ShortestPaths::compute(&NavGraph::from_connectivity("S", &recs));
        assert!(sp.distance("a", "b").is_none());
        assert!(sp.path("a", "b").is_none());
        assert!(sp.contains("a"));
    }
}
