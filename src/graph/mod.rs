//! Per-scan navigation graphs and precomputed shortest paths.

pub mod connectivity;
pub mod error;
pub mod index;
pub mod nav_graph;
pub mod shortest_paths;


pub use connectivity::{load_connectivity, ConnectivityRecord};
pub use error::GraphError;
pub use index::NavGraphIndex;
pub use nav_graph::{NavGraph, Viewpoint};
pub use shortest_paths::ShortestPaths;
