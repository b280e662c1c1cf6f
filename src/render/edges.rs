use std::ops::Range;

use egui::Color32;
use glam::{Mat4, Quat, Vec3};
use log::warn;
use petgraph::stable_graph::EdgeIndex;

use super::style::{EdgeStatus, StyleContext};
use crate::{GraphSession, PositionHandle};

/// One edge curve. Its sample points live in [`EdgeBatch::points`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurveInstance {
    pub index: EdgeIndex,
    pub points: Range<usize>,
    pub status: EdgeStatus,
    pub color: Color32,
    pub opacity: f32,
    pub thickness: f32,
    /// Radius of the invisible pick volume around the curve
    pub hit_radius: f32,
}

/// Arrow head near the target end, pointing along the curve tangent. The
/// arrow mesh is expected to point along +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowInstance {
    pub index: EdgeIndex,
    pub transform: Mat4,
    pub color: Color32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy)]
struct CachedEdge {
    index: EdgeIndex,
    source: PositionHandle,
    target: PositionHandle,
}

/// Batched edge curves plus their arrow heads.
///
/// Geometry is rebuilt every tick from live endpoint positions, so edges follow
/// drags and layout changes without being told. Edges with an endpoint missing
/// from the store are left out.
#[derive(Debug, Default)]
pub struct EdgeBatch {
    points: Vec<Vec3>,
    curves: Vec<CurveInstance>,
    arrows: Vec<ArrowInstance>,
    cached: Vec<CachedEdge>,
    revision: Option<u64>,
    dropped: usize,
}

impl EdgeBatch {
    pub fn new(capacity: usize, segments: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity * (segments + 1)),
            curves: Vec::with_capacity(capacity),
            arrows: Vec::with_capacity(capacity),
            cached: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    pub fn curves(&self) -> &[CurveInstance] {
        &self.curves
    }

    pub fn arrows(&self) -> &[ArrowInstance] {
        &self.arrows
    }

    /// Sample points of every curve, back to back.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn curve_points(&self, curve: &CurveInstance) -> &[Vec3] {
        self.points.get(curve.points.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn get(&self, idx: EdgeIndex) -> Option<&CurveInstance> {
        self.curves.iter().find(|c| c.index == idx)
    }

    pub(crate) fn rebuild(&mut self, session: &GraphSession, ctx: &StyleContext<'_>) {
        self.points.clear();
        self.curves.clear();
        self.arrows.clear();
        let store = session.spatial();
        let revision = session.revision();
        let settings = &session.settings().render;
        let Some(g) = session.graph() else {
            self.cached.clear();
            self.revision = None;
            self.report_dropped(0);
            return;
        };

        if self.revision != Some(revision) {
            self.cached.clear();
            self.cached.extend(g.edges_iter().filter_map(|(index, _, s, t)| {
                let source = store.handle(g.node_at(s)?.id())?;
                let target = store.handle(g.node_at(t)?.id())?;
                Some(CachedEdge {
                    index,
                    source,
                    target,
                })
            }));
            self.revision = Some(revision);
        }

        let segments = settings.curve_segments.max(1);
        let mut dropped = 0;
        for c in &self.cached {
            let (Some(p0), Some(p2)) = (store.resolve(c.source), store.resolve(c.target)) else {
                continue;
            };
            let Some(edge) = g.edge_at(c.index) else {
                continue;
            };
            let Some((src, tgt)) = g
                .g()
                .edge_endpoints(c.index)
                .and_then(|(s, t)| Some((g.node_at(s)?, g.node_at(t)?)))
            else {
                continue;
            };
            if self.curves.len() >= settings.edge_capacity {
                dropped += 1;
                continue;
            }

            let (status, opacity) = ctx.edge(edge, src, tgt);
            let color = status.color(ctx.style);
            let ctrl = control_point(p0, p2, settings.arc_bulge);

            let start = self.points.len();
            self.points.push(p0);
            for i in 1..segments {
                self.points.push(quadratic(p0, ctrl, p2, i as f32 / segments as f32));
            }
            self.points.push(p2);

            let t = settings.arrow_t.clamp(0., 1.);
            if let Some(dir) = tangent(p0, ctrl, p2, t).try_normalize() {
                self.arrows.push(ArrowInstance {
                    index: c.index,
                    transform: Mat4::from_scale_rotation_translation(
                        Vec3::splat(settings.arrow_size * edge.thickness()),
                        Quat::from_rotation_arc(Vec3::Y, dir),
                        quadratic(p0, ctrl, p2, t),
                    ),
                    color,
                    opacity,
                });
            }

            self.curves.push(CurveInstance {
                index: c.index,
                points: start..self.points.len(),
                status,
                color,
                opacity,
                thickness: edge.thickness(),
                hit_radius: settings.edge_hit_radius.max(edge.thickness()),
            });
        }
        self.report_dropped(dropped);
    }

    fn report_dropped(&mut self, dropped: usize) {
        if dropped != self.dropped && dropped > 0 {
            warn!("edge batch full, {dropped} edges not drawn");
        }
        self.dropped = dropped;
    }
}

/// Midpoint lifted along +Y by `bulge` times the endpoint separation.
pub fn control_point(p0: Vec3, p2: Vec3, bulge: f32) -> Vec3 {
    (p0 + p2) * 0.5 + Vec3::Y * p0.distance(p2) * bulge
}

pub fn quadratic(p0: Vec3, c: Vec3, p2: Vec3, t: f32) -> Vec3 {
    let u = 1. - t;
    p0 * (u * u) + c * (2. * u * t) + p2 * (t * t)
}

fn tangent(p0: Vec3, c: Vec3, p2: Vec3, t: f32) -> Vec3 {
    (c - p0) * (2. * (1. - t)) + (p2 - c) * (2. * t)
}
