use std::collections::HashSet;

use serde::Serialize;

use crate::graph::NodeId;

/// Node ids that are transparent to hop counting (interface or relay
/// placeholders that are not real radio hops).
pub type ZeroHopSet = HashSet<NodeId>;

fn is_zero_hop(id: &str, zero_hop: Option<&ZeroHopSet>) -> bool {
    zero_hop.is_some_and(|set| set.contains(id))
}

/// Effective hop count of `path`.
///
/// Endpoints never count. Each interior node counts one hop unless it is in
/// `zero_hop`. Paths of zero or one node have 0 hops.
pub fn calculate_actual_hops(path: &[NodeId], zero_hop: Option<&ZeroHopSet>) -> usize {
    if path.len() <= 1 {
        return 0;
    }
    path[1..path.len() - 1]
        .iter()
        .filter(|id| !is_zero_hop(id, zero_hop))
        .count()
}

/// Whether `path` fits inside a hop budget.
///
/// The origin alone always fits. Any longer path fits while its effective
/// hop count is strictly below `max_hops`, so without zero-hop nodes a path
/// may use at most `max_hops` edges.
pub(crate) fn within_budget(path: &[NodeId], max_hops: u32, zero_hop: Option<&ZeroHopSet>) -> bool {
    path.len() <= 1 || calculate_actual_hops(path, zero_hop) < max_hops as usize
}

/// Shortest / average / longest effective hop counts over a set of paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathStats {
    pub shortest: usize,
    pub longest: usize,
    /// Mean hop count, rounded to one decimal place.
    pub average: f64,
}

impl PathStats {
    /// `None` when `paths` is empty.
    pub fn from_paths(paths: &[Vec<NodeId>], zero_hop: Option<&ZeroHopSet>) -> Option<Self> {
        if paths.is_empty() {
            return None;
        }

        let counts: Vec<usize> = paths
            .iter()
            .map(|p| calculate_actual_hops(p, zero_hop))
            .collect();
        let shortest = counts.iter().copied().min()?;
        let longest = counts.iter().copied().max()?;
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;

        Some(Self {
            shortest,
            longest,
            average: (mean * 10.0).round() / 10.0,
        })
    }
}
