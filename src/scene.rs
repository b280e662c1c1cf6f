use egui::{Pos2, Rect};
use instant::Instant;

use crate::camera::{screen_to_ndc, Camera, FocusController, Ray};
use crate::clusters::ClusterVisualizer;
use crate::interaction::Interaction;
use crate::picking::{pick, PointerTarget};
use crate::render::RenderBatches;
use crate::GraphSession;

/// Pointer input in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
    Click(Pos2),
    /// Pointer left the viewport
    Leave,
}

/// Drives one 3D view: the render loop via [`Scene::tick`] and user input via
/// [`Scene::pointer`].
#[derive(Debug)]
pub struct Scene {
    pub session: GraphSession,
    pub camera: Camera,
    focus: FocusController,
    interaction: Interaction,
    batches: RenderBatches,
    clusters: ClusterVisualizer,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(GraphSession::default())
    }
}

impl Scene {
    pub fn new(session: GraphSession) -> Self {
        Self {
            camera: Camera::from_settings(&session.settings().camera),
            batches: RenderBatches::new(&session),
            session,
            focus: FocusController::new(),
            interaction: Interaction::new(),
            clusters: ClusterVisualizer::new(),
        }
    }

    pub fn batches(&self) -> &RenderBatches {
        &self.batches
    }

    pub fn clusters(&self) -> &ClusterVisualizer {
        &self.clusters
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// One render loop tick. Reads the session, never mutates it.
    pub fn tick(&mut self, now: Instant) {
        let session = &self.session;
        self.focus.update(
            session.modifiers().focus_node_id.as_deref(),
            session.spatial(),
            &mut self.camera,
            &session.settings().camera,
            now,
        );
        self.batches.rebuild(session);
        self.clusters.update(session);
    }

    /// What lies under `pos`, against the last built batches.
    pub fn pick(&self, viewport: Rect, pos: Pos2) -> PointerTarget {
        match (self.session.graph(), self.ray(viewport, pos)) {
            (Some(g), Some(ray)) => pick(
                &ray,
                g,
                &self.batches,
                &self.session.settings().render,
                self.session.settings().interaction.edge_select,
            ),
            _ => PointerTarget::Background,
        }
    }

    pub fn pointer(&mut self, viewport: Rect, event: PointerEvent) {
        match event {
            PointerEvent::Down(pos) => {
                let target = self.pick(viewport, pos);
                let ray = self.ray(viewport, pos);
                self.interaction
                    .pointer_down(&mut self.session, &mut self.camera, &target, ray);
            }
            PointerEvent::Move(pos) => {
                let ray = self.ray(viewport, pos);
                if self.interaction.is_dragging() {
                    self.interaction
                        .pointer_move(&mut self.session, &mut self.camera, ray);
                } else {
                    let target = self.pick(viewport, pos);
                    self.interaction.hover(&mut self.session, &target);
                }
            }
            PointerEvent::Up(pos) => {
                let ray = self.ray(viewport, pos);
                self.interaction
                    .pointer_up(&mut self.session, &mut self.camera, ray);
            }
            PointerEvent::Click(pos) => {
                let target = self.pick(viewport, pos);
                self.interaction.click(&mut self.session, &target);
            }
            PointerEvent::Leave => {
                self.interaction.cancel(&mut self.session, &mut self.camera);
                self.interaction
                    .hover(&mut self.session, &PointerTarget::Background);
            }
        }
    }

    fn ray(&self, viewport: Rect, pos: Pos2) -> Option<Ray> {
        let ndc = screen_to_ndc(viewport, pos)?;
        self.camera.ray_from_ndc(ndc)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::{Edge, Graph, Node};

    fn scene() -> (Scene, Rect) {
        let mut session = GraphSession::default();
        session.set_graph(Some(Graph::from_parts(
            vec![Node::new("a", Vec3::ZERO), Node::new("b", Vec3::new(40., 0., 0.))],
            vec![Edge::between("a", "b")],
        )));
        let mut scene = Scene::new(session);
        scene.camera.aspect = 1.;
        scene.tick(Instant::now());
        (scene, Rect::from_min_size(Pos2::ZERO, egui::vec2(800., 800.)))
    }

    fn screen_of(scene: &Scene, viewport: Rect, p: Vec3) -> Pos2 {
        let ndc = scene.camera.world_to_ndc(p).expect("visible");
        Pos2::new(
            viewport.min.x + (ndc.x + 1.) * 0.5 * viewport.width(),
            viewport.min.y + (1. - ndc.y) * 0.5 * viewport.height(),
        )
    }

    #[test]
    fn click_on_node_selects_it() {
        let (mut scene, vp) = scene();
        let at = screen_of(&scene, vp, Vec3::ZERO);
        assert_eq!(scene.pick(vp, at), PointerTarget::Node("a".into()));
        scene.pointer(vp, PointerEvent::Click(at));
        assert_eq!(scene.session.selected_node(), Some("a"));

        scene.pointer(vp, PointerEvent::Click(Pos2::new(5., 5.)));
        assert_eq!(scene.session.selected_node(), None);
    }

    #[test]
    fn tick_builds_one_batch_per_kind() {
        let (scene, _) = scene();
        assert_eq!(scene.batches().nodes.len(), 2);
        assert_eq!(scene.batches().edges.len(), 1);
        assert_eq!(scene.batches().edges.arrows().len(), 1);
    }

    #[test]
    fn hover_follows_pointer() {
        let (mut scene, vp) = scene();
        let at = screen_of(&scene, vp, Vec3::new(40., 0., 0.));
        scene.pointer(vp, PointerEvent::Move(at));
        assert_eq!(scene.session.hovered_node(), Some("b"));
        scene.pointer(vp, PointerEvent::Leave);
        assert_eq!(scene.session.hovered_node(), None);
    }
}
