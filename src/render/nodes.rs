use egui::Color32;
use glam::{Mat4, Vec3};
use log::warn;
use petgraph::stable_graph::NodeIndex;

use super::style::{NodeStatus, StyleContext};
use crate::{GraphSession, PositionHandle};

/// Per-instance attributes of the shared node sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeInstance {
    pub index: NodeIndex,
    pub transform: Mat4,
    pub position: Vec3,
    pub scale: f32,
    pub status: NodeStatus,
    pub fill: Color32,
    pub outline: Color32,
    pub opacity: f32,
}

impl NodeInstance {
    /// Fill with opacity applied, ready for upload.
    pub fn fill_rgba(&self) -> Color32 {
        self.fill.gamma_multiply(self.opacity)
    }
}

/// Single instanced batch holding every visible node.
///
/// Buffers are reused across frames. Position handles are resolved once per
/// session revision, every other tick only dereferences them.
#[derive(Debug, Default)]
pub struct NodeBatch {
    instances: Vec<NodeInstance>,
    handles: Vec<(NodeIndex, PositionHandle)>,
    revision: Option<u64>,
    dropped: usize,
}

impl NodeBatch {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            handles: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    pub fn instances(&self) -> &[NodeInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Nodes left out of the last frame because the batch was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&NodeInstance> {
        self.instances.iter().find(|i| i.index == idx)
    }

    pub(crate) fn rebuild(&mut self, session: &GraphSession, ctx: &StyleContext<'_>) {
        self.instances.clear();
        let store = session.spatial();
        let revision = session.revision();
        let node_radius = session.settings().render.node_radius;
        let capacity = session.settings().render.node_capacity;
        let Some(g) = session.graph() else {
            self.handles.clear();
            self.revision = None;
            self.report_dropped(0);
            return;
        };

        if self.revision != Some(revision) {
            self.handles.clear();
            self.handles.extend(
                g.nodes_iter()
                    .filter_map(|(idx, n)| store.handle(n.id()).map(|h| (idx, h))),
            );
            self.revision = Some(revision);
        }

        let mut dropped = 0;
        for &(idx, handle) in &self.handles {
            let (Some(position), Some(node)) = (store.resolve(handle), g.node_at(idx)) else {
                continue;
            };
            if self.instances.len() >= capacity {
                dropped += 1;
                continue;
            }
            let style = ctx.node(node);
            self.instances.push(NodeInstance {
                index: idx,
                transform: Mat4::from_scale_rotation_translation(
                    Vec3::splat(style.scale * node_radius),
                    glam::Quat::IDENTITY,
                    position,
                ),
                position,
                scale: style.scale,
                status: style.status,
                fill: style.fill,
                outline: style.outline,
                opacity: style.opacity,
            });
        }
        self.report_dropped(dropped);
    }

    fn report_dropped(&mut self, dropped: usize) {
        if dropped != self.dropped && dropped > 0 {
            warn!("node batch full, {dropped} nodes not drawn");
        }
        self.dropped = dropped;
    }
}
