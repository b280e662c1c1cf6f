//! Ray picking against the last built render batches.

use glam::Vec3;

use crate::camera::Ray;
use crate::render::RenderBatches;
use crate::settings::SettingsRender;
use crate::Graph;

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Node(String),
    Edge(String),
    /// The invisible ground behind the scene
    Background,
}

/// Nearest node sphere or edge hit volume along `ray`. Nodes win ties; nodes
/// faded out by filters below `pick_min_opacity` cannot be picked.
pub fn pick(
    ray: &Ray,
    graph: &Graph,
    batches: &RenderBatches,
    settings: &SettingsRender,
    edges: bool,
) -> PointerTarget {
    let mut best_node: Option<(f32, &str)> = None;
    for inst in batches.nodes.instances() {
        if inst.opacity < settings.pick_min_opacity {
            continue;
        }
        let Some(t) = ray_sphere(ray, inst.position, inst.scale * settings.node_radius) else {
            continue;
        };
        if best_node.is_none_or(|(best, _)| t < best) {
            if let Some(n) = graph.node_at(inst.index) {
                best_node = Some((t, n.id()));
            }
        }
    }

    let mut best_edge: Option<(f32, &str)> = None;
    if edges {
        for curve in batches.edges.curves() {
            let Some(t) = ray_polyline(ray, batches.edges.curve_points(curve), curve.hit_radius) else {
                continue;
            };
            if best_edge.is_none_or(|(best, _)| t < best) {
                if let Some(e) = graph.edge_at(curve.index) {
                    best_edge = Some((t, e.id()));
                }
            }
        }
    }

    match (best_node, best_edge) {
        (Some((tn, _)), Some((te, id))) if te < tn => PointerTarget::Edge(id.to_string()),
        (Some((_, id)), _) => PointerTarget::Node(id.to_string()),
        (None, Some((_, id))) => PointerTarget::Edge(id.to_string()),
        (None, None) => PointerTarget::Background,
    }
}

/// Distance along the ray to the first hit of the sphere, `0` when the origin
/// is inside it.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    if c <= 0. {
        return Some(0.);
    }
    let disc = b * b - c;
    if disc < 0. || b > 0. {
        return None;
    }
    let t = -b - disc.sqrt();
    (t.is_finite() && t >= 0.).then_some(t)
}

/// Distance along the ray to the closest approach of a polyline, if that
/// approach is within `radius`.
pub fn ray_polyline(ray: &Ray, points: &[Vec3], radius: f32) -> Option<f32> {
    points
        .windows(2)
        .filter_map(|w| {
            let (dist, t) = ray_segment(ray, w[0], w[1]);
            (dist <= radius).then_some(t)
        })
        .min_by(f32::total_cmp)
}

/// Closest approach between the ray and segment `start..end`: the distance and
/// the ray parameter where it happens.
fn ray_segment(ray: &Ray, start: Vec3, end: Vec3) -> (f32, f32) {
    let seg = end - start;
    let offset = ray.origin - start;
    let seg_len2 = seg.dot(seg);
    let dir_seg = ray.dir.dot(seg);
    let dir_off = ray.dir.dot(offset);
    let seg_off = seg.dot(offset);

    let mut along = if seg_len2 <= f32::EPSILON {
        0.
    } else {
        let denom = seg_len2 - dir_seg * dir_seg;
        if denom.abs() <= f32::EPSILON {
            (seg_off / seg_len2).clamp(0., 1.)
        } else {
            ((seg_off - dir_seg * dir_off) / denom).clamp(0., 1.)
        }
    };
    let mut ray_t = (dir_seg * along - dir_off).max(0.);
    if seg_len2 > f32::EPSILON {
        along = ((ray_t * dir_seg + seg_off) / seg_len2).clamp(0., 1.);
        ray_t = (dir_seg * along - dir_off).max(0.);
    }

    let dist = ray.at(ray_t).distance(start + seg * along);
    (dist, ray_t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_from(x: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, 10., z), Vec3::NEG_Y).expect("ray")
    }

    #[test]
    fn sphere_hit_distance() {
        assert_eq!(ray_sphere(&down_from(0., 0.), Vec3::ZERO, 2.), Some(8.));
        assert_eq!(ray_sphere(&down_from(3., 0.), Vec3::ZERO, 2.), None);
        // behind the origin
        let up = Ray::new(Vec3::new(0., 10., 0.), Vec3::Y).expect("ray");
        assert_eq!(ray_sphere(&up, Vec3::ZERO, 2.), None);
    }

    #[test]
    fn segment_within_radius_is_hit() {
        let line = [Vec3::new(-5., 0., 0.), Vec3::new(5., 0., 0.)];
        let t = ray_polyline(&down_from(1., 0.5), &line, 1.).expect("hit");
        assert!((t - 10.).abs() < 1e-4);
        assert!(ray_polyline(&down_from(1., 2.), &line, 1.).is_none());
        assert!(ray_polyline(&down_from(8., 0.), &line, 1.).is_none());
    }

    #[test]
    fn parallel_segment() {
        let ray = Ray::new(Vec3::new(0., 0.5, -10.), Vec3::Z).expect("ray");
        let line = [Vec3::ZERO, Vec3::new(0., 0., 5.)];
        let t = ray_polyline(&ray, &line, 1.).expect("hit");
        assert!((0. ..=15.).contains(&t));
    }
}
