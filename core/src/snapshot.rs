//! Loading a captured network snapshot from JSON.
//!
//! Link endpoints arrive either as a bare id string or as a node object
//! carrying an `id`. Both shapes are resolved here into [`DirectedEdge`]s so
//! nothing downstream has to care which one it got.

use std::path::Path;

use serde::Deserialize;

use crate::error::{EndpointSide, MeshPathError, Result};
use crate::graph::{DirectedEdge, NodeId};
use crate::hops::ZeroHopSet;
use crate::options::PathFindingOptions;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LinkEndpoint {
    Id(NodeId),
    Node { id: NodeId },
}

impl LinkEndpoint {
    pub fn id(&self) -> &str {
        match self {
            LinkEndpoint::Id(id) | LinkEndpoint::Node { id } => id,
        }
    }
}

/// One link as it appears in a snapshot. Unknown fields (signal strength,
/// colours, timestamps) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRecord {
    pub source: LinkEndpoint,
    pub target: LinkEndpoint,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSnapshot {
    pub links: Vec<LinkRecord>,
    #[serde(default)]
    pub zero_hop_nodes: ZeroHopSet,
    /// Optional traversal budgets stored alongside the capture.
    #[serde(default)]
    pub options: Option<PathFindingOptions>,
}

impl NetworkSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| MeshPathError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Resolve every link to a [`DirectedEdge`], dropping self-links.
    ///
    /// Fails on the first link with an empty endpoint id.
    pub fn edges(&self) -> Result<Vec<DirectedEdge>> {
        let mut edges = Vec::with_capacity(self.links.len());
        for (index, link) in self.links.iter().enumerate() {
            let source = link.source.id();
            let target = link.target.id();
            if source.is_empty() {
                return Err(MeshPathError::EmptyEndpoint {
                    index,
                    side: EndpointSide::Source,
                });
            }
            if target.is_empty() {
                return Err(MeshPathError::EmptyEndpoint {
                    index,
                    side: EndpointSide::Target,
                });
            }
            let edge = DirectedEdge::new(source, target);
            if !edge.is_self_loop() {
                edges.push(edge);
            }
        }
        Ok(edges)
    }

    /// Stored options (or defaults) with the snapshot's zero-hop nodes merged in.
    pub fn path_options(&self) -> Result<PathFindingOptions> {
        let mut options = self.options.clone().unwrap_or_default();
        options
            .zero_hop_nodes
            .extend(self.zero_hop_nodes.iter().cloned());
        options.validate()?;
        Ok(options)
    }
}
