use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use super::connectivity::ConnectivityRecord;
use crate::geometry::Position3;
use crate::Id;

/// A navigable location inside one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewpoint {
    pub id: Id,
    pub position: Position3,
}

/// Undirected, distance-weighted viewpoint graph of a single scan.
///
/// # Invariants
///
/// - Every node is an `included` viewpoint of the connectivity file
/// - Edge weights are the Euclidean distance between endpoint positions
/// - At most one edge per unordered pair of viewpoints
#[derive(Debug, Clone)]
pub struct NavGraph {
    scan: Id,
    graph: UnGraph<Viewpoint, f64>,
    node_by_id: HashMap<Id, NodeIndex>,
}

impl NavGraph {
    /// Builds the graph of `scan` from its connectivity records.
    ///
    /// An edge `(i, j)` is created when both viewpoints are included and `i`
    /// has an unobstructed view of `j`.
    pub fn from_connectivity(scan: impl Into<Id>, records: &[ConnectivityRecord]) -> Self {
        let mut graph = UnGraph::default();
        let mut node_by_id = HashMap::new();
        let mut node_of_record: Vec<Option<NodeIndex>> = Vec::with_capacity(records.len());

        for rec in records {
            if rec.included {
                let node = graph.add_node(Viewpoint {
                    id: rec.image_id.clone(),
                    position: rec.position(),
                });
                node_by_id.insert(rec.image_id.clone(), node);
                node_of_record.push(Some(node));
            } else {
                node_of_record.push(None);
            }
        }

        for (i, rec) in records.iter().enumerate() {
            let Some(a) = node_of_record[i] else { continue };
            for (j, other) in records.iter().enumerate().skip(i + 1) {
                let Some(b) = node_of_record[j] else { continue };
                if (rec.sees(j) || other.sees(i)) && graph.find_edge(a, b).is_none() {
                    let weight = graph[a].position.distance_to(&graph[b].position);
                    graph.add_edge(a, b, weight);
                }
            }
        }

        Self {
            scan: scan.into(),
            graph,
            node_by_id,
        }
    }

    pub fn scan(&self) -> &str {
        &self.scan
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the node index for a viewpoint id, if present.
    pub fn node_of(&self, viewpoint: &str) -> Option<NodeIndex> {
        self.node_by_id.get(viewpoint).copied()
    }

    pub fn viewpoint(&self, node: NodeIndex) -> Option<&Viewpoint> {
        self.graph.node_weight(node)
    }

    /// Position of a viewpoint, if present.
    pub fn position(&self, viewpoint: &str) -> Option<Position3> {
        self.node_of(viewpoint).map(|n| self.graph[n].position)
    }

    /// Iterates all viewpoints of the scan.
    pub fn viewpoints(&self) -> impl Iterator<Item = &Viewpoint> {
        self.graph.node_weights()
    }

    /// Neighbours of `viewpoint` with the connecting edge weight.
    pub fn neighbors(&self, viewpoint: &str) -> Vec<(&Viewpoint, f64)> {
        let Some(node) = self.node_of(viewpoint) else {
            return Vec::new();
        };
        self.graph
            .edges(node)
            .map(|e| {
                let other = if e.source() == node { e.target() } else { e.source() };
                (&self.graph[other], *e.weight())
            })
            .collect()
    }

    pub(crate) fn inner(&self) -> &UnGraph<Viewpoint, f64> {
        &self.graph
    }
}
