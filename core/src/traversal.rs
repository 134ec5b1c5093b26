use std::collections::{HashSet, VecDeque};

use crate::graph::{link_key, AdjacencyMap, DirectedEdge, EdgeIndex, NodeId};
use crate::hops::{within_budget, ZeroHopSet};
use crate::options::PathFindingOptions;

/// Everything reachable from one source within a hop budget.
#[derive(Debug, Default)]
pub struct Reachability {
    /// Every node on any explored path, the source included.
    pub nodes: HashSet<NodeId>,
    /// `"<source>-<target>"` keys of every directed edge actually traversed.
    pub links: HashSet<String>,
    /// Distinct paths expanded during the scan.
    pub paths_explored: usize,
}

/// Push every admissible one-edge extension of `path` onto `queue`.
///
/// Extensions follow adjacency, skip nodes already on the path (simple paths
/// only) and are re-checked against the literal edge set so a drifting
/// adjacency can never introduce an edge the caller did not supply.
fn extend_path(
    path: &[NodeId],
    adjacency: &AdjacencyMap,
    index: &EdgeIndex,
    max_hops: u32,
    zero_hop: Option<&ZeroHopSet>,
    queue: &mut VecDeque<Vec<NodeId>>,
) {
    let Some(current) = path.last() else {
        return;
    };
    let Some(neighbors) = adjacency.neighbors(current) else {
        return;
    };

    for neighbor in neighbors {
        if path.contains(neighbor) || !index.contains(current, neighbor) {
            continue;
        }
        let mut next = Vec::with_capacity(path.len() + 1);
        next.extend_from_slice(path);
        next.push(neighbor.clone());
        if within_budget(&next, max_hops, zero_hop) {
            queue.push_back(next);
        }
    }
}

/// Enumerate simple directed paths from `source` to `target`.
///
/// Breadth-first, so paths come back in discovery order: fewer edges first.
/// Stops once `options.max_paths` paths have been accepted. Every path stays
/// within `options.max_hops` (effective hops strictly below the budget, see
/// [`crate::calculate_actual_hops`]) and every consecutive pair is a literal
/// input edge in that direction.
///
/// Returns an empty list when either id is empty or absent from `edges`, or
/// when `source == target`. A zero-length path is never returned.
#[tracing::instrument(
    skip(edges, options),
    fields(
        max_hops = options.max_hops,
        max_paths = options.max_paths,
        edges = edges.len(),
    )
)]
pub fn find_paths_between_nodes(
    source: &str,
    target: &str,
    edges: &[DirectedEdge],
    options: &PathFindingOptions,
) -> Vec<Vec<NodeId>> {
    if source.is_empty() || target.is_empty() || source == target {
        return Vec::new();
    }

    let index = EdgeIndex::from_edges(edges);
    if !index.contains_node(source) || !index.contains_node(target) {
        tracing::debug!("endpoint not in graph");
        return Vec::new();
    }

    let adjacency = AdjacencyMap::build_with_index(edges, &index);
    let zero_hop = options.zero_hop();

    let mut paths: Vec<Vec<NodeId>> = Vec::new();
    let mut visited: HashSet<Vec<NodeId>> = HashSet::new();
    let mut queue: VecDeque<Vec<NodeId>> = VecDeque::new();
    queue.push_back(vec![source.to_string()]);

    while paths.len() < options.max_paths {
        let Some(path) = queue.pop_front() else {
            break;
        };

        if path.len() > 1 && path.last().is_some_and(|id| id == target) {
            paths.push(path);
            continue;
        }

        if !visited.insert(path.clone()) {
            continue;
        }

        extend_path(
            &path,
            &adjacency,
            &index,
            options.max_hops,
            zero_hop,
            &mut queue,
        );
    }

    let found = paths.len();
    paths.retain(|path| {
        let valid = index.validates_path(path);
        if !valid {
            tracing::warn!(path = ?path, "dropping path with a non-existent directed edge");
        }
        valid
    });

    tracing::debug!(
        found,
        returned = paths.len(),
        expanded = visited.len(),
        "path enumeration complete"
    );
    paths
}

/// Breadth-first scan outward from `source`, collecting every node and every
/// traversed directed edge on paths within `max_hops`.
///
/// There is no result cap: work is bounded only by the hop budget and the
/// size of the graph. Paths are deduplicated by their exact node sequence, so
/// the same edge reached along several paths is recorded once.
#[tracing::instrument(skip(edges, zero_hop), fields(edges = edges.len()))]
pub fn scan_reachable(
    source: &str,
    edges: &[DirectedEdge],
    max_hops: u32,
    zero_hop: Option<&ZeroHopSet>,
) -> Reachability {
    let mut result = Reachability::default();
    if source.is_empty() {
        return result;
    }

    let index = EdgeIndex::from_edges(edges);
    if !index.contains_node(source) {
        tracing::debug!("source not in graph");
        return result;
    }

    let adjacency = AdjacencyMap::build_with_index(edges, &index);

    let mut visited: HashSet<Vec<NodeId>> = HashSet::new();
    let mut queue: VecDeque<Vec<NodeId>> = VecDeque::new();
    queue.push_back(vec![source.to_string()]);

    while let Some(path) = queue.pop_front() {
        if !visited.insert(path.clone()) {
            continue;
        }

        // The prefix was recorded when the parent path was expanded, so only
        // the newest node and edge are new here.
        if let Some(last) = path.last() {
            result.nodes.insert(last.clone());
        }
        if let [.., from, to] = path.as_slice() {
            if index.contains(from, to) {
                result.links.insert(link_key(from, to));
            }
        }

        extend_path(&path, &adjacency, &index, max_hops, zero_hop, &mut queue);
    }

    result.paths_explored = visited.len();
    tracing::debug!(
        nodes = result.nodes.len(),
        links = result.links.len(),
        paths_explored = result.paths_explored,
        "reachability scan complete"
    );
    result
}

/// Node ids reachable from `source` within `max_hops`, the source included.
///
/// Empty when `source` is empty or does not appear in `edges`.
pub fn find_reachable_nodes(
    source: &str,
    edges: &[DirectedEdge],
    max_hops: u32,
    zero_hop: Option<&ZeroHopSet>,
) -> HashSet<NodeId> {
    scan_reachable(source, edges, max_hops, zero_hop).nodes
}

/// `"<source>-<target>"` keys of the directed edges traversed when scanning
/// outward from `source` within `max_hops`. Only directions that exist in
/// `edges` and were actually walked appear.
pub fn find_reachable_links(
    source: &str,
    edges: &[DirectedEdge],
    max_hops: u32,
    zero_hop: Option<&ZeroHopSet>,
) -> HashSet<String> {
    scan_reachable(source, edges, max_hops, zero_hop).links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(from: &str, to: &str) -> DirectedEdge {
        DirectedEdge::new(from, to)
    }

    fn both(a: &str, b: &str) -> [DirectedEdge; 2] {
        [edge(a, b), edge(b, a)]
    }

    fn ids(list: &[&str]) -> Vec<NodeId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn set(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn opts(max_hops: u32, max_paths: usize) -> PathFindingOptions {
        PathFindingOptions::default()
            .with_max_hops(max_hops)
            .with_max_paths(max_paths)
    }

    fn make_chain(n: usize) -> Vec<DirectedEdge> {
        (0..n - 1)
            .map(|i| edge(&format!("n{}", i), &format!("n{}", i + 1)))
            .collect()
    }

    fn make_cycle(n: usize) -> Vec<DirectedEdge> {
        (0..n)
            .map(|i| edge(&format!("n{}", i), &format!("n{}", (i + 1) % n)))
            .collect()
    }

    fn make_diamond() -> Vec<DirectedEdge> {
        vec![edge("A", "B"), edge("A", "C"), edge("B", "D"), edge("C", "D")]
    }

    /// Complete bidirectional graph on `n` nodes.
    fn make_clique(n: usize) -> Vec<DirectedEdge> {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    edges.push(edge(&format!("n{}", i), &format!("n{}", j)));
                }
            }
        }
        edges
    }

    // --- Path enumeration ---

    #[test]
    fn test_paths_respect_direction() {
        let edges = vec![edge("A", "B"), edge("B", "C")];
        let forward = find_paths_between_nodes("A", "C", &edges, &opts(5, 10));
        assert_eq!(forward, vec![ids(&["A", "B", "C"])]);

        let backward = find_paths_between_nodes("C", "A", &edges, &opts(5, 10));
        assert!(backward.is_empty());
    }

    #[test]
    fn test_paths_reverse_with_literal_reverse_edges() {
        let mut edges = Vec::new();
        edges.extend(both("A", "B"));
        edges.extend(both("B", "C"));
        let backward = find_paths_between_nodes("C", "A", &edges, &opts(5, 10));
        assert_eq!(backward, vec![ids(&["C", "B", "A"])]);
    }

    #[test]
    fn test_paths_self_is_empty() {
        let edges = vec![edge("A", "B"), edge("B", "A")];
        assert!(find_paths_between_nodes("A", "A", &edges, &opts(5, 10)).is_empty());
    }

    #[test]
    fn test_paths_missing_endpoint() {
        let edges = make_chain(3);
        assert!(find_paths_between_nodes("n0", "zz", &edges, &opts(5, 10)).is_empty());
        assert!(find_paths_between_nodes("zz", "n2", &edges, &opts(5, 10)).is_empty());
        assert!(find_paths_between_nodes("", "n2", &edges, &opts(5, 10)).is_empty());
    }

    #[test]
    fn test_paths_empty_graph() {
        assert!(find_paths_between_nodes("A", "B", &[], &opts(5, 10)).is_empty());
    }

    #[test]
    fn test_paths_hop_budget() {
        let edges = vec![edge("A", "B"), edge("B", "C"), edge("C", "D")];
        assert!(find_paths_between_nodes("A", "D", &edges, &opts(2, 10)).is_empty());
        assert_eq!(
            find_paths_between_nodes("A", "D", &edges, &opts(3, 10)),
            vec![ids(&["A", "B", "C", "D"])]
        );
    }

    #[test]
    fn test_paths_zero_budget_finds_nothing() {
        let edges = vec![edge("A", "B")];
        assert!(find_paths_between_nodes("A", "B", &edges, &opts(0, 10)).is_empty());
        assert_eq!(
            find_paths_between_nodes("A", "B", &edges, &opts(1, 10)),
            vec![ids(&["A", "B"])]
        );
    }

    #[test]
    fn test_paths_zero_hop_nodes_are_free() {
        let edges = vec![edge("A", "iface"), edge("iface", "B")];
        assert!(find_paths_between_nodes("A", "B", &edges, &opts(1, 10)).is_empty());

        let with_iface = opts(1, 10).with_zero_hop_nodes(["iface"]);
        assert_eq!(
            find_paths_between_nodes("A", "B", &edges, &with_iface),
            vec![ids(&["A", "iface", "B"])]
        );
    }

    #[test]
    fn test_paths_breadth_first_order() {
        let mut edges = make_diamond();
        edges.push(edge("A", "D"));
        let paths = find_paths_between_nodes("A", "D", &edges, &opts(5, 10));
        assert_eq!(
            paths,
            vec![ids(&["A", "D"]), ids(&["A", "B", "D"]), ids(&["A", "C", "D"])]
        );
    }

    #[test]
    fn test_paths_cap_respected() {
        let edges = make_diamond();
        let paths = find_paths_between_nodes("A", "D", &edges, &opts(5, 1));
        assert_eq!(paths, vec![ids(&["A", "B", "D"])]);
    }

    #[test]
    fn test_paths_cap_zero() {
        let edges = make_diamond();
        assert!(find_paths_between_nodes("A", "D", &edges, &opts(5, 0)).is_empty());
    }

    #[test]
    fn test_paths_no_expansion_past_target() {
        // B is the target; nothing beyond it may be part of a result.
        let edges = vec![edge("A", "B"), edge("B", "C"), edge("C", "B")];
        let paths = find_paths_between_nodes("A", "B", &edges, &opts(10, 10));
        assert_eq!(paths, vec![ids(&["A", "B"])]);
    }

    #[test]
    fn test_paths_cycle_terminates() {
        let edges = make_cycle(5);
        let paths = find_paths_between_nodes("n0", "n3", &edges, &opts(100, 100));
        assert_eq!(paths, vec![ids(&["n0", "n1", "n2", "n3"])]);
    }

    #[test]
    fn test_paths_are_simple_in_clique() {
        let edges = make_clique(5);
        let paths = find_paths_between_nodes("n0", "n4", &edges, &opts(10, 1000));
        // 1 + 3 + 6 + 6 simple paths of 1..=4 edges
        assert_eq!(paths.len(), 16);
        for path in &paths {
            let unique: HashSet<_> = path.iter().collect();
            assert_eq!(unique.len(), path.len());
        }
        assert!(paths.windows(2).all(|w| w[0].len() <= w[1].len()));
    }

    #[test]
    fn test_paths_parallel_edges() {
        let edges = vec![edge("A", "B"), edge("A", "B"), edge("A", "B")];
        let paths = find_paths_between_nodes("A", "B", &edges, &opts(1, 10));
        assert_eq!(paths, vec![ids(&["A", "B"])]);
    }

    // --- Reachability ---

    #[test]
    fn test_reachable_nodes_budget() {
        let edges = vec![edge("A", "B"), edge("B", "C")];
        assert_eq!(find_reachable_nodes("A", &edges, 1, None), set(&["A", "B"]));
        assert_eq!(
            find_reachable_nodes("A", &edges, 2, None),
            set(&["A", "B", "C"])
        );
    }

    #[test]
    fn test_reachable_nodes_zero_budget_is_source_only() {
        let edges = make_chain(4);
        assert_eq!(find_reachable_nodes("n0", &edges, 0, None), set(&["n0"]));
        assert!(find_reachable_links("n0", &edges, 0, None).is_empty());
    }

    #[test]
    fn test_reachable_missing_source() {
        let edges = make_chain(3);
        assert!(find_reachable_nodes("zz", &edges, 5, None).is_empty());
        assert!(find_reachable_nodes("", &edges, 5, None).is_empty());
        assert!(find_reachable_links("zz", &edges, 5, None).is_empty());
    }

    #[test]
    fn test_reachable_is_directed() {
        let edges = make_chain(4);
        assert_eq!(find_reachable_nodes("n3", &edges, 10, None), set(&["n3"]));
        assert_eq!(
            find_reachable_nodes("n1", &edges, 10, None),
            set(&["n1", "n2", "n3"])
        );
    }

    #[test]
    fn test_reachable_zero_hop_extends_reach() {
        let edges = vec![edge("A", "relay"), edge("relay", "B"), edge("B", "C")];
        let zero = set(&["relay"]);
        assert_eq!(
            find_reachable_nodes("A", &edges, 1, Some(&zero)),
            set(&["A", "relay", "B"])
        );
        assert_eq!(
            find_reachable_nodes("A", &edges, 1, None),
            set(&["A", "relay"])
        );
    }

    #[test]
    fn test_reachable_links_keys() {
        let mut edges = Vec::new();
        edges.extend(both("A", "B"));
        edges.push(edge("B", "C"));
        let links = find_reachable_links("A", &edges, 5, None);
        // B-A exists but walking it would revisit A
        assert_eq!(links, set(&["A-B", "B-C"]));
    }

    #[test]
    fn test_reachable_links_cycle() {
        let edges = make_cycle(5);
        let links = find_reachable_links("n0", &edges, 100, None);
        assert_eq!(links, set(&["n0-n1", "n1-n2", "n2-n3", "n3-n4"]));
    }

    #[test]
    fn test_reachable_links_dedup_per_edge() {
        // D-E is reached along two distinct paths but recorded once.
        let mut edges = make_diamond();
        edges.push(edge("D", "E"));
        let scan = scan_reachable("A", &edges, 10, None);
        assert_eq!(
            scan.links,
            set(&["A-B", "A-C", "B-D", "C-D", "D-E"])
        );
        assert_eq!(scan.nodes, set(&["A", "B", "C", "D", "E"]));
        // [A] [A,B] [A,C] [A,B,D] [A,C,D] [A,B,D,E] [A,C,D,E]
        assert_eq!(scan.paths_explored, 7);
    }

    #[test]
    fn test_reachable_monotonic_in_budget() {
        let edges = make_clique(4);
        let mut previous = HashSet::new();
        for hops in 0..5 {
            let current = find_reachable_nodes("n0", &edges, hops, None);
            assert!(current.is_superset(&previous));
            previous = current;
        }
        assert_eq!(previous.len(), 4);
    }

    #[test]
    fn test_reachable_star() {
        let edges: Vec<_> = (0..50).map(|i| edge("hub", &format!("leaf{}", i))).collect();
        let scan = scan_reachable("hub", &edges, 1, None);
        assert_eq!(scan.nodes.len(), 51);
        assert_eq!(scan.links.len(), 50);
    }
}
