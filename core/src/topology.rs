//! Turns observed mesh links into the directed edge list the traversal
//! functions consume.
//!
//! This is where direction decisions are made: which links become one edge
//! or two, and how a link heard through unseen relays becomes a chain of
//! single-segment edges through hidden placeholder nodes.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::{AdjacencyMap, DirectedEdge, NodeId};

/// Id of the synthetic broker node linked to every node that reported a
/// self-link (a packet it relayed to itself over the broker uplink).
pub const BROKER_NODE_ID: &str = "mqtt_broker";

/// Prefix of synthetic relay placeholders; `hidden_0`, `hidden_1`, ...
pub const HIDDEN_NODE_PREFIX: &str = "hidden_";

/// One observed directed link between two mesh nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedLink {
    pub source: NodeId,
    pub target: NodeId,
    /// Unseen relays between the endpoints. 0 means heard directly.
    #[serde(default)]
    pub relay_hops: u32,
    /// Only ever heard through the MQTT broker uplink, never over the air.
    #[serde(default)]
    pub via_mqtt: bool,
}

impl ObservedLink {
    pub fn direct(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::relayed(source, target, 0)
    }

    pub fn relayed(source: impl Into<NodeId>, target: impl Into<NodeId>, relay_hops: u32) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relay_hops,
            via_mqtt: false,
        }
    }

    /// A link that reached the collector over the broker only.
    pub fn mqtt(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            via_mqtt: true,
            ..Self::direct(source, target)
        }
    }

    fn edge(&self) -> DirectedEdge {
        DirectedEdge::new(self.source.clone(), self.target.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyOptions {
    /// Keep only links heard in both directions.
    pub bidirectional_only: bool,
    /// Synthesize the reverse of every link that lacks one.
    pub force_bidirectional: bool,
    /// Drop relayed links instead of expanding them into hidden chains.
    pub exclude_multi_hop: bool,
    /// Add the broker node for nodes that reported self-links.
    pub broker_for_self_links: bool,
}

impl Default for TopologyOptions {
    fn default() -> Self {
        Self {
            bidirectional_only: false,
            force_bidirectional: false,
            exclude_multi_hop: false,
            broker_for_self_links: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Topology {
    pub edges: Vec<DirectedEdge>,
    /// Relay placeholders created while expanding relayed links, in order.
    pub hidden_nodes: Vec<NodeId>,
    /// Set when the broker node was added.
    pub broker: Option<NodeId>,
}

/// Build the directed edge list from observed links.
///
/// Steps run in a fixed order: self-links are set aside, then the
/// bidirectional filter, then reverse synthesis, then relay expansion (which
/// also drops links heard only over MQTT), then broker links. Hidden node
/// numbering restarts at 0 on every call.
#[tracing::instrument(skip(links), fields(links = links.len()))]
pub fn build_topology(links: &[ObservedLink], options: &TopologyOptions) -> Topology {
    let mut self_linked: BTreeSet<NodeId> = BTreeSet::new();
    let mut kept: Vec<ObservedLink> = Vec::with_capacity(links.len());
    for link in links {
        if link.edge().is_self_loop() {
            self_linked.insert(link.source.clone());
        } else {
            kept.push(link.clone());
        }
    }

    if options.bidirectional_only {
        let edges: Vec<DirectedEdge> = kept.iter().map(ObservedLink::edge).collect();
        let adjacency = AdjacencyMap::build(&edges);
        kept.retain(|l| adjacency.is_bidirectional(&l.source, &l.target));
    }

    if options.force_bidirectional {
        let mut present: HashSet<DirectedEdge> = kept.iter().map(ObservedLink::edge).collect();
        let mut reverses = Vec::new();
        for link in &kept {
            let reverse = link.edge().reversed();
            if present.insert(reverse.clone()) {
                reverses.push(ObservedLink {
                    source: reverse.source,
                    target: reverse.target,
                    ..link.clone()
                });
            }
        }
        kept.extend(reverses);
    }

    let mut topology = Topology::default();
    let mut mqtt_only = 0usize;
    for link in &kept {
        if link.via_mqtt {
            mqtt_only += 1;
        } else if link.relay_hops == 0 {
            topology.edges.push(link.edge());
        } else if !options.exclude_multi_hop {
            expand_relayed(link, &mut topology);
        }
    }

    if options.broker_for_self_links && !self_linked.is_empty() {
        for node in &self_linked {
            let uplink = DirectedEdge::new(node.clone(), BROKER_NODE_ID);
            let downlink = uplink.reversed();
            topology.edges.push(uplink);
            topology.edges.push(downlink);
        }
        topology.broker = Some(BROKER_NODE_ID.to_string());
    }

    tracing::debug!(
        edges = topology.edges.len(),
        hidden = topology.hidden_nodes.len(),
        mqtt_only,
        broker = topology.broker.is_some(),
        "topology built"
    );
    topology
}

/// Replace `source -(n relays)-> target` with a chain through `n` fresh
/// hidden nodes: `n + 1` single-segment edges.
fn expand_relayed(link: &ObservedLink, topology: &mut Topology) {
    let mut previous = link.source.clone();
    for _ in 0..link.relay_hops {
        let hidden = format!("{}{}", HIDDEN_NODE_PREFIX, topology.hidden_nodes.len());
        topology
            .edges
            .push(DirectedEdge::new(previous, hidden.clone()));
        topology.hidden_nodes.push(hidden.clone());
        previous = hidden;
    }
    topology
        .edges
        .push(DirectedEdge::new(previous, link.target.clone()));
}
