use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Presentation overlays on top of the graph.
///
/// Modifiers never remove anything from the underlying graph: a "removed" node
/// stays addressable (for undo) and is only drawn differently. Ids that do not
/// resolve to a live node or edge are ignored by every consumer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualModifiers {
    pub added_node_ids: HashSet<String>,
    pub removed_node_ids: HashSet<String>,
    pub added_edge_ids: HashSet<String>,
    pub removed_edge_ids: HashSet<String>,
    pub highlighted_node_id: Option<String>,
    pub focus_node_id: Option<String>,
}

impl VisualModifiers {
    pub fn is_node_added(&self, id: &str) -> bool {
        self.added_node_ids.contains(id)
    }

    pub fn is_node_removed(&self, id: &str) -> bool {
        self.removed_node_ids.contains(id)
    }

    pub fn is_edge_added(&self, id: &str) -> bool {
        self.added_edge_ids.contains(id)
    }

    pub fn is_edge_removed(&self, id: &str) -> bool {
        self.removed_edge_ids.contains(id)
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted_node_id.as_deref() == Some(id)
    }
}
