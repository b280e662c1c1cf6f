/// Reversible what-if edit recorded by the session.
///
/// Every field lists exactly what the edit inserted, so undoing it removes that
/// and nothing else: ids that were already present before the edit are not
/// recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A node was added together with some edges
    AddedNode {
        node_id: String,
        /// Edges inserted by this edit, resolved or dangling
        edge_ids: Vec<String>,
        /// Whether the node id was newly put into the added-nodes modifier
        marked_node: bool,
        /// Edge ids newly put into the added-edges modifier
        marked_edges: Vec<String>,
    },

    /// A node and its incident edges were marked removed
    MarkedRemoved {
        node_id: String,
        marked_node: bool,
        marked_edges: Vec<String>,
    },
}

impl Change {
    pub fn node_id(&self) -> &str {
        match self {
            Change::AddedNode { node_id, .. } | Change::MarkedRemoved { node_id, .. } => node_id,
        }
    }
}
