use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Mesh node identifier. Opaque: a radio node id, a hidden relay placeholder,
/// or a synthetic broker id. Compared by exact string equality.
pub type NodeId = String;

/// A directed edge with both endpoints already resolved to plain identifiers.
///
/// A logical bidirectional link is two `DirectedEdge`s. Nothing in this crate
/// ever infers the reverse direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectedEdge {
    pub source: NodeId,
    pub target: NodeId,
}

impl DirectedEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Link key in the `"<source>-<target>"` form used by reachable-link sets.
    pub fn key(&self) -> String {
        link_key(&self.source, &self.target)
    }

    /// The same link in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Format a directed link key. No escaping: ids containing `-` produce
/// ambiguous keys, same as every consumer of these sets expects.
pub fn link_key(source: &str, target: &str) -> String {
    format!("{}-{}", source, target)
}

/// Literal lookup over a caller-supplied edge collection.
///
/// Answers "does the edge `a -> b` exist in exactly this direction" in O(1),
/// and which ids appear in any edge at all. Parallel edges collapse.
#[derive(Debug, Default)]
pub struct EdgeIndex {
    targets: HashMap<NodeId, HashSet<NodeId>>,
    nodes: HashSet<NodeId>,
}

impl EdgeIndex {
    pub fn from_edges(edges: &[DirectedEdge]) -> Self {
        let mut targets: HashMap<NodeId, HashSet<NodeId>> = HashMap::with_capacity(edges.len());
        let mut nodes = HashSet::with_capacity(edges.len());
        for edge in edges {
            nodes.insert(edge.source.clone());
            nodes.insert(edge.target.clone());
            targets
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());
        }
        Self { targets, nodes }
    }

    /// True when `source -> target` literally exists.
    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.targets
            .get(source)
            .is_some_and(|t| t.contains(target))
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// Every consecutive pair of `path` is a literal edge.
    pub fn validates_path(&self, path: &[NodeId]) -> bool {
        path.windows(2).all(|w| self.contains(&w[0], &w[1]))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct directed pairs.
    pub fn edge_count(&self) -> usize {
        self.targets.values().map(|t| t.len()).sum()
    }
}

/// Directed adjacency derived from an edge collection: node -> direct successors.
///
/// Every id that appears in any edge is a key, possibly with an empty set
/// (a pure sink). Ids with no edges are absent. Successor sets are ordered,
/// so traversal order never depends on the order edges were supplied in.
#[derive(Debug, Default)]
pub struct AdjacencyMap {
    successors: HashMap<NodeId, BTreeSet<NodeId>>,
}

impl AdjacencyMap {
    /// Build adjacency from `edges`, respecting direction.
    ///
    /// For each edge `s -> t`, `t` is recorded under `s`. `s` is recorded
    /// under `t` only when the literal reverse edge `t -> s` is also present.
    pub fn build(edges: &[DirectedEdge]) -> Self {
        let index = EdgeIndex::from_edges(edges);
        Self::build_with_index(edges, &index)
    }

    /// Same as [`AdjacencyMap::build`], reusing an already built [`EdgeIndex`].
    pub fn build_with_index(edges: &[DirectedEdge], index: &EdgeIndex) -> Self {
        let mut successors: HashMap<NodeId, BTreeSet<NodeId>> =
            HashMap::with_capacity(index.node_count());

        for edge in edges {
            successors.entry(edge.target.clone()).or_default();
            successors
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.target.clone());

            if index.contains(&edge.target, &edge.source) {
                successors
                    .entry(edge.target.clone())
                    .or_default()
                    .insert(edge.source.clone());
            }
        }

        Self { successors }
    }

    /// Direct successors of `id`. `None` means the id is not in the graph,
    /// which is distinct from `Some` of an empty set.
    pub fn neighbors(&self, id: &str) -> Option<&BTreeSet<NodeId>> {
        self.successors.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.successors.contains_key(id)
    }

    /// Both `a -> b` and `b -> a` are present.
    pub fn is_bidirectional(&self, a: &str, b: &str) -> bool {
        let forward = self.neighbors(a).is_some_and(|n| n.contains(b));
        let backward = self.neighbors(b).is_some_and(|n| n.contains(a));
        forward && backward
    }

    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.values().map(|s| s.len()).sum()
    }
}

/// Convenience wrapper around [`AdjacencyMap::build`].
pub fn build_adjacency_list(edges: &[DirectedEdge]) -> AdjacencyMap {
    AdjacencyMap::build(edges)
}
