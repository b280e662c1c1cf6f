use glam::Vec3;

/// Pairwise inverse-square repulsion. Pairs closer than `sqrt(epsilon)` are
/// treated as coincident for this step and skipped.
pub(crate) fn compute_repulsion(pos: &[Vec3], vel: &mut [Vec3], c_repulse: f32, max_force: f32, epsilon: f32) {
    for i in 0..pos.len() {
        for j in (i + 1)..pos.len() {
            let delta = pos[i] - pos[j];
            let dist_sq = delta.length_squared();
            if dist_sq < epsilon {
                continue;
            }
            let force = (c_repulse / dist_sq).min(max_force);
            let dir = delta / dist_sq.sqrt();
            vel[i] += dir * force;
            vel[j] -= dir * force;
        }
    }
}

/// Linear spring along every edge: force grows with the current separation.
pub(crate) fn compute_attraction(
    pos: &[Vec3],
    vel: &mut [Vec3],
    springs: &[(usize, usize)],
    c_attract: f32,
    max_force: f32,
    epsilon: f32,
) {
    for &(a, b) in springs {
        let delta = pos[b] - pos[a];
        let distance = delta.length();
        if distance * distance < epsilon {
            continue;
        }
        let force = (distance * c_attract).min(max_force);
        let dir = delta / distance;
        vel[a] += dir * force;
        vel[b] -= dir * force;
    }
}

/// Pulls every node towards `center` so the layout does not drift away.
pub(crate) fn apply_center_gravity(pos: &[Vec3], vel: &mut [Vec3], center: Vec3, c: f32) {
    if c == 0.0 {
        return;
    }
    for (p, v) in pos.iter().zip(vel.iter_mut()) {
        *v += (center - *p) * c;
    }
}

/// Clamps, integrates and damps velocities. Non-finite results leave the node in place.
pub(crate) fn integrate(pos: &mut [Vec3], vel: &mut [Vec3], max_velocity: f32, damping: f32) {
    for (p, v) in pos.iter_mut().zip(vel.iter_mut()) {
        *v = v.clamp_length_max(max_velocity);
        let next = *p + *v;
        if next.is_finite() {
            *p = next;
        } else {
            *v = Vec3::ZERO;
        }
        *v *= damping;
    }
}

pub(crate) fn centroid(pos: &[Vec3]) -> Vec3 {
    if pos.is_empty() {
        return Vec3::ZERO;
    }
    pos.iter().copied().sum::<Vec3>() / pos.len() as f32
}

/// Uniformly scales positions so the farthest node sits at `radius` from the origin.
/// Layouts collapsed onto the origin are left untouched.
pub(crate) fn rescale(pos: &mut [Vec3], radius: f32, epsilon: f32) {
    let max_dist = pos.iter().map(|p| p.length()).fold(0.0_f32, f32::max);
    if !max_dist.is_finite() || max_dist * max_dist < epsilon {
        return;
    }
    let scale = radius / max_dist;
    for p in pos.iter_mut() {
        *p *= scale;
    }
}
