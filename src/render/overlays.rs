use egui::Color32;
use glam::Vec3;
use petgraph::stable_graph::NodeIndex;

use super::nodes::NodeBatch;
use crate::GraphSession;

/// Ring or glow drawn around one node, sized from its rendered sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub node: NodeIndex,
    pub center: Vec3,
    pub radius: f32,
    pub color: Color32,
}

/// At most one selection ring and one glow per frame. The glow follows the
/// hovered node, falling back to the highlighted one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlays {
    pub selection: Option<Ring>,
    pub glow: Option<Ring>,
}

const RING_MARGIN: f32 = 1.4;

impl Overlays {
    pub(crate) fn rebuild(&mut self, session: &GraphSession, nodes: &NodeBatch) {
        let graph = session.graph();
        let style = &session.settings().style;
        let node_radius = session.settings().render.node_radius;
        let ring = |id: Option<&str>, color: Color32| {
            let idx = graph?.node_index(id?)?;
            let inst = nodes.get(idx)?;
            Some(Ring {
                node: idx,
                center: inst.position,
                radius: inst.scale * node_radius * RING_MARGIN,
                color,
            })
        };
        self.selection = ring(session.selected_node(), style.selection_color);
        self.glow = match session.hovered_node() {
            Some(id) => ring(Some(id), style.hover_color),
            None => ring(
                session.modifiers().highlighted_node_id.as_deref(),
                style.highlight_color,
            ),
        };
    }
}
