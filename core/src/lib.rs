//! mesh-paths-core: directed path-finding over mesh radio topologies.
//!
//! A pure Rust library that enumerates simple directed paths between two
//! nodes and scans what a node can reach within a hop budget. Some nodes
//! (interface or relay placeholders) can be marked zero-hop so they do not
//! count against the budget.
//!
//! Every operation is synchronous and builds its working structures fresh
//! from the edge list it is handed. Nothing is cached between calls.

pub mod error;
mod graph;
mod hops;
mod options;
mod selection;
pub mod snapshot;
pub mod topology;
mod traversal;

pub use error::{MeshPathError, Result};
pub use graph::{build_adjacency_list, link_key, AdjacencyMap, DirectedEdge, EdgeIndex, NodeId};
pub use hops::{calculate_actual_hops, PathStats, ZeroHopSet};
pub use options::{PathFindingOptions, DEFAULT_MAX_HOPS, DEFAULT_MAX_PATHS};
pub use selection::{analyze_selection, Selection, SelectionAnalysis};
pub use snapshot::{LinkEndpoint, LinkRecord, NetworkSnapshot};
pub use topology::{build_topology, ObservedLink, Topology, TopologyOptions};
pub use traversal::{
    find_paths_between_nodes, find_reachable_links, find_reachable_nodes, scan_reachable,
    Reachability,
};
