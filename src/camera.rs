use std::time::Duration;

use egui::{Pos2, Rect};
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};
use instant::Instant;
use log::debug;

use crate::settings::SettingsCamera;
use crate::SpatialStore;

const PARALLEL_EPSILON: f32 = 1e-6;

/// Perspective orbit camera.
///
/// `target` is the orbit pivot. Orbit controls are expected to pivot around it
/// and to stay idle while `orbit_enabled` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub orbit_enabled: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_settings(&SettingsCamera::default())
    }
}

impl Camera {
    pub fn from_settings(settings: &SettingsCamera) -> Self {
        Self {
            position: Vec3::new(0., 80., 160.),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: settings.fov_y,
            aspect: 16. / 9.,
            near: settings.near,
            far: settings.far,
            orbit_enabled: true,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right-handed perspective with depth in `0..1`.
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(f32::EPSILON), self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Ray from the camera through a point given in normalized device
    /// coordinates. `None` for degenerate camera setups.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let inv = self.view_proj().inverse();
        let far = inv * ndc.extend(1.).extend(1.);
        if far.w.abs() < f32::EPSILON {
            return None;
        }
        let far = far.xyz() / far.w;
        Ray::new(self.position, far - self.position)
    }

    /// Projects a world point to normalized device coordinates. `None` behind
    /// the camera.
    pub fn world_to_ndc(&self, p: Vec3) -> Option<Vec3> {
        let clip = self.view_proj() * p.extend(1.);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(clip.xyz() / clip.w)
    }
}

/// Converts a pointer position inside `viewport` to normalized device
/// coordinates, y pointing up.
pub fn screen_to_ndc(viewport: Rect, pos: Pos2) -> Option<Vec2> {
    if viewport.width() <= 0. || viewport.height() <= 0. {
        return None;
    }
    let x = (pos.x - viewport.min.x) / viewport.width() * 2. - 1.;
    let y = 1. - (pos.y - viewport.min.y) / viewport.height() * 2.;
    Some(Vec2::new(x, y))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length
    pub dir: Vec3,
}

impl Ray {
    /// `None` if `dir` cannot be normalized.
    pub fn new(origin: Vec3, dir: Vec3) -> Option<Self> {
        if !origin.is_finite() {
            return None;
        }
        Some(Self {
            origin,
            dir: dir.try_normalize()?,
        })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// Horizontal plane through `point`.
    pub fn horizontal(point: Vec3) -> Self {
        Self {
            point,
            normal: Vec3::Y,
        }
    }

    /// Intersection point in front of the ray origin. `None` when the ray runs
    /// parallel to the plane or points away from it.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denom = self.normal.dot(ray.dir);
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t < 0. {
            return None;
        }
        Some(ray.at(t)).filter(|p| p.is_finite())
    }
}

#[derive(Debug, Clone)]
struct Transition {
    from: Vec3,
    to: Vec3,
    started: Instant,
}

/// One-shot camera focus transition.
///
/// When the focus id changes to a tracked node the camera glides to a fixed
/// offset from the node's live position and the orbit target is pointed at
/// the node. After `focus_reset_after` the orbit target returns to the origin,
/// whatever happened in between. A new focus id replaces the pending reset.
#[derive(Debug, Clone, Default)]
pub struct FocusController {
    last_id: Option<String>,
    transition: Option<Transition>,
    reset_at: Option<Instant>,
}

impl FocusController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transition or a pending reset is in flight.
    pub fn is_active(&self) -> bool {
        self.transition.is_some() || self.reset_at.is_some()
    }

    pub fn update(
        &mut self,
        focus_id: Option<&str>,
        store: &SpatialStore,
        camera: &mut Camera,
        settings: &SettingsCamera,
        now: Instant,
    ) {
        if self.last_id.as_deref() != focus_id {
            self.last_id = focus_id.map(str::to_string);
            if let Some(node) = focus_id.and_then(|id| store.get(id)) {
                camera.target = node;
                self.transition = Some(Transition {
                    from: camera.position,
                    to: node + settings.focus_offset,
                    started: now,
                });
                self.reset_at = Some(now + secs(settings.focus_reset_after));
            } else if let Some(id) = focus_id {
                debug!("focus target {id} is not tracked");
            }
        }

        if let Some(tr) = &self.transition {
            let elapsed = if now > tr.started {
                (now - tr.started).as_secs_f32()
            } else {
                0.
            };
            let t = if settings.focus_duration > 0. {
                (elapsed / settings.focus_duration).clamp(0., 1.)
            } else {
                1.
            };
            camera.position = tr.from.lerp(tr.to, smoothstep(t));
            if t >= 1. {
                self.transition = None;
            }
        }

        if self.reset_at.is_some_and(|at| now >= at) {
            camera.target = Vec3::ZERO;
            self.reset_at = None;
        }
    }
}

fn secs(s: f32) -> Duration {
    Duration::from_secs_f32(s.max(0.))
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3. - 2. * t)
}
