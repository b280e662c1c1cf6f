mod edges;
mod nodes;
mod overlays;
mod style;

pub use self::edges::{control_point, quadratic, ArrowInstance, CurveInstance, EdgeBatch};
pub use self::nodes::{NodeBatch, NodeInstance};
pub use self::overlays::{Overlays, Ring};
pub use self::style::{complexity_scale, EdgeStatus, NodeStatus, NodeStyle, StyleContext};

use crate::GraphSession;

/// Every draw batch of a frame: one instanced node batch, one edge batch and
/// the overlay meshes.
#[derive(Debug, Default)]
pub struct RenderBatches {
    pub nodes: NodeBatch,
    pub edges: EdgeBatch,
    pub overlays: Overlays,
}

impl RenderBatches {
    pub fn new(session: &GraphSession) -> Self {
        let render = &session.settings().render;
        Self {
            nodes: NodeBatch::new(render.node_capacity),
            edges: EdgeBatch::new(render.edge_capacity, render.curve_segments),
            overlays: Overlays::default(),
        }
    }

    /// Re-derives all batches from the session. Called once per tick; the
    /// session is only read.
    pub fn rebuild(&mut self, session: &GraphSession) {
        let ctx = StyleContext::from_session(session);
        self.nodes.rebuild(session, &ctx);
        self.edges.rebuild(session, &ctx);
        self.overlays.rebuild(session, &self.nodes);
    }
}
