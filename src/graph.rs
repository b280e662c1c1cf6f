use std::collections::HashMap;

use log::debug;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use serde::{Deserialize, Serialize};

use crate::{Edge, Node};

/// Cheap fingerprint of a graph snapshot: node count plus first and last node id.
///
/// Deliberately shallow so that reordering or re-wrapping the same content does
/// not look like a new graph and wipe drag progress.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphIdentity {
    pub count: usize,
    pub first: Option<String>,
    pub last: Option<String>,
}

/// Graph snapshot backed by [`petgraph::stable_graph::StableGraph`].
///
/// Nodes and edges are addressed by their stable string ids. Every lookup returns
/// an `Option`: unknown ids are a normal branch, never an error. Edges whose
/// endpoints do not resolve are kept aside as dangling: they stay addressable but
/// are never part of layout or rendering.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    g: StableGraph<Node, Edge>,
    node_ids: HashMap<String, NodeIndex>,
    edge_ids: HashMap<String, EdgeIndex>,
    dangling: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from node and edge lists. Duplicate ids keep the first occurrence.
    pub fn from_parts(nodes: impl IntoIterator<Item = Node>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut g = Self::new();
        for n in nodes {
            if g.add_node(n).is_none() {
                debug!("skipping node with duplicate id");
            }
        }
        for e in edges {
            g.add_edge(e);
        }
        g
    }

    pub fn g(&self) -> &StableGraph<Node, Edge> {
        &self.g
    }

    pub fn node_count(&self) -> usize {
        self.g.node_count()
    }

    /// Number of resolved edges. Dangling edges are not counted.
    pub fn edge_count(&self) -> usize {
        self.g.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.g.node_count() == 0
    }

    pub fn identity(&self) -> GraphIdentity {
        let mut ids = self.g.node_indices();
        let first = ids.next();
        let last = ids.next_back().or(first);
        GraphIdentity {
            count: self.g.node_count(),
            first: first.map(|idx| self.g[idx].id().to_string()),
            last: last.map(|idx| self.g[idx].id().to_string()),
        }
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_ids.get(id).copied()
    }

    pub fn edge_index(&self, id: &str) -> Option<EdgeIndex> {
        self.edge_ids.get(id).copied()
    }

    /// Whether an edge with this id exists, resolved or dangling.
    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_ids.contains_key(id) || self.dangling.iter().any(|e| e.id() == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_ids.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index(id).and_then(|idx| self.g.node_weight(idx))
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = self.node_index(id)?;
        self.g.node_weight_mut(idx)
    }

    pub fn node_at(&self, idx: NodeIndex) -> Option<&Node> {
        self.g.node_weight(idx)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index(id).and_then(|idx| self.g.edge_weight(idx))
    }

    pub fn edge_at(&self, idx: EdgeIndex) -> Option<&Edge> {
        self.g.edge_weight(idx)
    }

    /// Nodes in insertion order.
    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.g
            .node_indices()
            .filter_map(|idx| self.g.node_weight(idx).map(|n| (idx, n)))
    }

    /// Resolved edges together with their endpoint indices.
    pub fn edges_iter(&self) -> impl Iterator<Item = (EdgeIndex, &Edge, NodeIndex, NodeIndex)> {
        self.g
            .edge_references()
            .map(|e| (e.id(), e.weight(), e.source(), e.target()))
    }

    pub fn dangling_edges(&self) -> &[Edge] {
        &self.dangling
    }

    /// Ids of every edge touching `id`, dangling ones excluded.
    pub fn incident_edge_ids(&self, id: &str) -> Vec<String> {
        let Some(idx) = self.node_index(id) else {
            return Vec::new();
        };
        let mut ids: Vec<String> = self
            .g
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .chain(self.g.edges_directed(idx, petgraph::Direction::Incoming))
            .map(|e| e.weight().id().to_string())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Adds a node. Returns `None` if a node with the same id already exists.
    pub fn add_node(&mut self, node: Node) -> Option<NodeIndex> {
        if self.node_ids.contains_key(node.id()) {
            return None;
        }
        let id = node.id().to_string();
        let idx = self.g.add_node(node);
        self.node_ids.insert(id, idx);
        self.resolve_dangling();
        Some(idx)
    }

    /// Adds an edge. Edges with an unknown endpoint are kept as dangling and `None`
    /// is returned, as it is for a duplicate id.
    pub fn add_edge(&mut self, edge: Edge) -> Option<EdgeIndex> {
        if self.contains_edge(edge.id()) {
            debug!("skipping edge with duplicate id {}", edge.id());
            return None;
        }
        let (Some(source), Some(target)) = (self.node_index(edge.source()), self.node_index(edge.target())) else {
            debug!(
                "edge {} has a dangling endpoint ({} -> {})",
                edge.id(),
                edge.source(),
                edge.target()
            );
            self.dangling.push(edge);
            return None;
        };
        let id = edge.id().to_string();
        let idx = self.g.add_edge(source, target, edge);
        self.edge_ids.insert(id, idx);
        Some(idx)
    }

    /// Removes a node together with its resolved incident edges.
    pub fn remove_node(&mut self, id: &str) -> Option<(Node, Vec<Edge>)> {
        let idx = self.node_ids.remove(id)?;
        let incident: Vec<EdgeIndex> = self
            .g
            .edges_directed(idx, petgraph::Direction::Outgoing)
            .chain(self.g.edges_directed(idx, petgraph::Direction::Incoming))
            .map(|e| e.id())
            .collect();
        let mut removed = Vec::with_capacity(incident.len());
        for e_idx in incident {
            if let Some(e) = self.g.remove_edge(e_idx) {
                self.edge_ids.remove(e.id());
                removed.push(e);
            }
        }
        let node = self.g.remove_node(idx)?;
        Some((node, removed))
    }

    /// Removes an edge by id, dangling edges included.
    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        if let Some(idx) = self.edge_ids.remove(id) {
            return self.g.remove_edge(idx);
        }
        let pos = self.dangling.iter().position(|e| e.id() == id)?;
        Some(self.dangling.remove(pos))
    }

    /// Indices of the nodes carrying the given cluster id, in insertion order.
    pub fn cluster_members(&self, cluster_id: u32) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes_iter()
            .filter(move |(_, n)| n.cluster_id() == Some(cluster_id))
            .map(|(idx, _)| idx)
    }

    fn resolve_dangling(&mut self) {
        if self.dangling.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.dangling);
        for e in pending {
            self.add_edge(e);
        }
    }
}
