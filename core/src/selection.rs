use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::{DirectedEdge, NodeId};
use crate::hops::PathStats;
use crate::options::PathFindingOptions;
use crate::traversal::{find_paths_between_nodes, scan_reachable};

/// Up to two nodes picked by the user on the topology view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub primary: Option<NodeId>,
    pub secondary: Option<NodeId>,
}

impl Selection {
    pub fn single(id: impl Into<NodeId>) -> Self {
        Self {
            primary: Some(id.into()),
            secondary: None,
        }
    }

    pub fn pair(primary: impl Into<NodeId>, secondary: impl Into<NodeId>) -> Self {
        Self {
            primary: Some(primary.into()),
            secondary: Some(secondary.into()),
        }
    }
}

/// What the view highlights for a selection.
///
/// A pair of distinct nodes yields paths between them; a single node yields
/// its reachable nodes and links. The other half is always empty.
#[derive(Debug, Default)]
pub struct SelectionAnalysis {
    pub paths: Vec<Vec<NodeId>>,
    /// Union of every node on any of `paths`.
    pub path_nodes: HashSet<NodeId>,
    pub reachable_nodes: HashSet<NodeId>,
    pub reachable_links: HashSet<String>,
    pub stats: Option<PathStats>,
}

#[tracing::instrument(skip(edges, options), fields(edges = edges.len()))]
pub fn analyze_selection(
    selection: &Selection,
    edges: &[DirectedEdge],
    options: &PathFindingOptions,
) -> SelectionAnalysis {
    match (selection.primary.as_deref(), selection.secondary.as_deref()) {
        (Some(primary), Some(secondary)) if primary != secondary => {
            let paths = find_paths_between_nodes(primary, secondary, edges, options);
            let path_nodes = paths.iter().flatten().cloned().collect();
            let stats = PathStats::from_paths(&paths, options.zero_hop());
            SelectionAnalysis {
                paths,
                path_nodes,
                stats,
                ..Default::default()
            }
        }
        (Some(primary), None) => {
            let scan = scan_reachable(primary, edges, options.max_hops, options.zero_hop());
            SelectionAnalysis {
                reachable_nodes: scan.nodes,
                reachable_links: scan.links,
                ..Default::default()
            }
        }
        _ => SelectionAnalysis::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges() -> Vec<DirectedEdge> {
        vec![
            DirectedEdge::new("A", "B"),
            DirectedEdge::new("B", "C"),
            DirectedEdge::new("A", "C"),
        ]
    }

    fn set(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pair_selection_finds_paths() {
        let analysis = analyze_selection(
            &Selection::pair("A", "C"),
            &edges(),
            &PathFindingOptions::default(),
        );
        assert_eq!(analysis.paths.len(), 2);
        assert_eq!(analysis.path_nodes, set(&["A", "B", "C"]));
        assert!(analysis.reachable_nodes.is_empty());
        assert!(analysis.reachable_links.is_empty());

        let stats = analysis.stats.unwrap();
        assert_eq!(stats.shortest, 0);
        assert_eq!(stats.longest, 1);
        assert_eq!(stats.average, 0.5);
    }

    #[test]
    fn test_single_selection_scans() {
        let analysis = analyze_selection(
            &Selection::single("B"),
            &edges(),
            &PathFindingOptions::default(),
        );
        assert!(analysis.paths.is_empty());
        assert!(analysis.stats.is_none());
        assert_eq!(analysis.reachable_nodes, set(&["B", "C"]));
        assert_eq!(analysis.reachable_links, set(&["B-C"]));
    }

    #[test]
    fn test_same_node_twice_is_empty() {
        let analysis = analyze_selection(
            &Selection::pair("A", "A"),
            &edges(),
            &PathFindingOptions::default(),
        );
        assert!(analysis.paths.is_empty());
        assert!(analysis.reachable_nodes.is_empty());
    }

    #[test]
    fn test_nothing_selected() {
        let analysis = analyze_selection(
            &Selection::default(),
            &edges(),
            &PathFindingOptions::default(),
        );
        assert!(analysis.paths.is_empty());
        assert!(analysis.path_nodes.is_empty());
        assert!(analysis.reachable_links.is_empty());
    }

    #[test]
    fn test_secondary_only_is_empty() {
        let selection = Selection {
            primary: None,
            secondary: Some("A".to_string()),
        };
        let analysis = analyze_selection(&selection, &edges(), &PathFindingOptions::default());
        assert!(analysis.reachable_nodes.is_empty());
    }
}
