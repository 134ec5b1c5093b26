use serde::{Deserialize, Serialize};

use crate::error::{MeshPathError, Result};
use crate::hops::ZeroHopSet;

pub const DEFAULT_MAX_HOPS: u32 = 3;
pub const DEFAULT_MAX_PATHS: usize = 100;

/// Budgets for path enumeration and reachability scans.
///
/// These are the only guard against combinatorial blow-up on dense or cyclic
/// graphs; nothing inside the traversal caps work beyond them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathFindingOptions {
    /// Hop budget. See [`crate::calculate_actual_hops`] for how hops count.
    pub max_hops: u32,
    /// Maximum number of paths returned by the enumerator.
    pub max_paths: usize,
    /// Interior nodes that do not count as hops.
    pub zero_hop_nodes: ZeroHopSet,
}

impl Default for PathFindingOptions {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            max_paths: DEFAULT_MAX_PATHS,
            zero_hop_nodes: ZeroHopSet::new(),
        }
    }
}

impl PathFindingOptions {
    pub fn with_max_hops(mut self, max_hops: u32) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    pub fn with_zero_hop_nodes<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zero_hop_nodes = ids.into_iter().map(Into::into).collect();
        self
    }

    /// `None` when no zero-hop nodes are configured.
    pub fn zero_hop(&self) -> Option<&ZeroHopSet> {
        if self.zero_hop_nodes.is_empty() {
            None
        } else {
            Some(&self.zero_hop_nodes)
        }
    }

    /// Reject option sets that can never produce a result.
    pub fn validate(&self) -> Result<()> {
        if self.max_paths == 0 {
            return Err(MeshPathError::InvalidOption {
                name: "max_paths",
                value: self.max_paths.to_string(),
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
