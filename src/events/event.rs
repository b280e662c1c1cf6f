use serde::{Deserialize, Serialize};

use crate::layouts::LayoutMode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeSelect {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDeselect {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadEdgeSelect {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadEdgeDeselect {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeHoverEnter {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeHoverLeave {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragStart {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeMove {
    pub id: String,
    pub diff: [f32; 3],
    pub new_pos: [f32; 3],
}

/// Final position of a dragged node. Consumers persisting manual layout edits
/// listen for this one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadNodeDragEnd {
    pub id: String,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadLayoutChange {
    pub old: LayoutMode,
    pub new: LayoutMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadFocus {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadUndo {
    pub node_id: String,
}

/// Discrete state changes published by the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    NodeSelect(PayloadNodeSelect),
    NodeDeselect(PayloadNodeDeselect),
    EdgeSelect(PayloadEdgeSelect),
    EdgeDeselect(PayloadEdgeDeselect),
    NodeHoverEnter(PayloadNodeHoverEnter),
    NodeHoverLeave(PayloadNodeHoverLeave),
    NodeDragStart(PayloadNodeDragStart),
    NodeMove(PayloadNodeMove),
    NodeDragEnd(PayloadNodeDragEnd),
    LayoutChange(PayloadLayoutChange),
    Focus(PayloadFocus),
    Undo(PayloadUndo),
}
