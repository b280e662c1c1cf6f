use glam::Vec3;
use log::debug;

use crate::camera::{Camera, Plane, Ray};
use crate::events::{Event, PayloadNodeDragEnd, PayloadNodeDragStart, PayloadNodeMove};
use crate::picking::PointerTarget;
use crate::GraphSession;

#[derive(Debug, Clone)]
struct Drag {
    node: String,
    plane: Plane,
    /// Node position minus the anchor. Unknown until the pointer ray first
    /// meets the drag plane.
    offset: Option<Vec3>,
    last: Vec3,
}

/// Translates pointer input into selection, hover and drag mutations.
///
/// Drags write straight into the spatial store. Only drag start and end,
/// plus the per-move notification, go through the session's event sink.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    drag: Option<Drag>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn dragged_node(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.node.as_str())
    }

    /// Click: selects a node or an edge, clears the selection on background.
    pub fn click(&mut self, session: &mut GraphSession, target: &PointerTarget) {
        match target {
            PointerTarget::Node(id) => session.select_node(Some(id)),
            PointerTarget::Edge(id) => {
                if session.settings().interaction.edge_select {
                    session.select_edge(Some(id));
                }
            }
            PointerTarget::Background => session.clear_selection(),
        }
    }

    pub fn hover(&mut self, session: &mut GraphSession, target: &PointerTarget) {
        if !session.settings().interaction.node_hover {
            return;
        }
        match target {
            PointerTarget::Node(id) => session.hover_node(Some(id)),
            _ => session.hover_node(None),
        }
    }

    /// Pointer press. On an unselected node this only selects it; on the
    /// selected node it starts a drag on the horizontal plane through the node.
    pub fn pointer_down(
        &mut self,
        session: &mut GraphSession,
        camera: &mut Camera,
        target: &PointerTarget,
        ray: Option<Ray>,
    ) {
        let PointerTarget::Node(id) = target else {
            return;
        };
        if session.selected_node() != Some(id.as_str()) {
            session.select_node(Some(id));
            return;
        }
        if !session.settings().interaction.node_drag {
            return;
        }
        let Some(position) = session.spatial().get(id) else {
            return;
        };

        let plane = Plane::horizontal(position);
        let offset = ray.and_then(|r| plane.intersect(&r)).map(|anchor| position - anchor);
        self.drag = Some(Drag {
            node: id.clone(),
            plane,
            offset,
            last: position,
        });
        camera.orbit_enabled = false;

        debug!("drag start on {id}");
        session.publish_event(Event::NodeDragStart(PayloadNodeDragStart { id: id.clone() }));
    }

    /// Pointer move during a drag. A ray missing the plane skips this update.
    pub fn pointer_move(&mut self, session: &mut GraphSession, camera: &mut Camera, ray: Option<Ray>) {
        let Some(drag) = self.drag.as_ref() else {
            return;
        };
        if session.selected_node() != Some(drag.node.as_str()) {
            self.end_drag(session, camera);
            return;
        }
        self.drag_to(session, ray);
    }

    /// Pointer release: commits the final position and ends the drag.
    pub fn pointer_up(&mut self, session: &mut GraphSession, camera: &mut Camera, ray: Option<Ray>) {
        if self.drag.is_none() {
            return;
        }
        if self
            .drag
            .as_ref()
            .is_some_and(|d| session.selected_node() == Some(d.node.as_str()))
        {
            self.drag_to(session, ray);
        }
        self.end_drag(session, camera);
    }

    /// Ends any drag in progress, committing its last known position.
    pub fn cancel(&mut self, session: &mut GraphSession, camera: &mut Camera) {
        self.end_drag(session, camera);
    }

    fn drag_to(&mut self, session: &mut GraphSession, ray: Option<Ray>) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let Some(hit) = ray.and_then(|r| drag.plane.intersect(&r)) else {
            return;
        };
        let Some(offset) = drag.offset else {
            drag.offset = Some(drag.last - hit);
            return;
        };

        let new_pos = hit + offset;
        if !session.spatial_mut().set_vec(&drag.node, new_pos) {
            return;
        }
        let diff = new_pos - drag.last;
        drag.last = new_pos;
        session.publish_event(Event::NodeMove(PayloadNodeMove {
            id: drag.node.clone(),
            diff: diff.to_array(),
            new_pos: new_pos.to_array(),
        }));
    }

    fn end_drag(&mut self, session: &mut GraphSession, camera: &mut Camera) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        session.spatial_mut().set_vec(&drag.node, drag.last);
        camera.target = Vec3::ZERO;
        camera.orbit_enabled = true;

        debug!("drag end on {} at {}", drag.node, drag.last);
        session.publish_event(Event::NodeDragEnd(PayloadNodeDragEnd {
            id: drag.node,
            position: drag.last.to_array(),
        }));
    }
}
