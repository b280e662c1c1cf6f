use egui::Color32;
use glam::Vec3;

use crate::{GraphSession, PositionHandle};

/// Padded axis-aligned bounds of one cluster's members for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterBox {
    pub id: u32,
    pub min: Vec3,
    pub max: Vec3,
    pub color: Color32,
    pub member_count: usize,
}

impl ClusterBox {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[derive(Debug, Clone)]
struct Members {
    id: u32,
    color: Color32,
    handles: Vec<PositionHandle>,
}

/// Cluster bounding boxes that follow their members.
///
/// Membership is resolved once per session revision; the boxes themselves are
/// recomputed from live positions on every [`Self::update`].
#[derive(Debug, Default)]
pub struct ClusterVisualizer {
    members: Vec<Members>,
    boxes: Vec<ClusterBox>,
    revision: Option<u64>,
}

impl ClusterVisualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boxes(&self) -> &[ClusterBox] {
        &self.boxes
    }

    pub fn update(&mut self, session: &GraphSession) {
        self.boxes.clear();
        let store = session.spatial();

        if self.revision != Some(session.revision()) {
            self.members.clear();
            if let Some(g) = session.graph() {
                let palette = &session.settings().style.palette;
                for c in session.clusters() {
                    let handles: Vec<PositionHandle> = g
                        .cluster_members(c.id)
                        .filter_map(|idx| g.node_at(idx))
                        .filter_map(|n| store.handle(n.id()))
                        .collect();
                    if !handles.is_empty() {
                        self.members.push(Members {
                            id: c.id,
                            color: c.color(palette),
                            handles,
                        });
                    }
                }
            }
            self.revision = Some(session.revision());
        }

        let padding = Vec3::splat(session.settings().render.cluster_padding);
        for m in &self.members {
            let mut min = Vec3::INFINITY;
            let mut max = Vec3::NEG_INFINITY;
            let mut count = 0;
            for p in m.handles.iter().filter_map(|h| store.resolve(*h)) {
                min = min.min(p);
                max = max.max(p);
                count += 1;
            }
            if count == 0 {
                continue;
            }
            self.boxes.push(ClusterBox {
                id: m.id,
                min: min - padding,
                max: max + padding,
                color: m.color,
                member_count: count,
            });
        }
    }
}
