//! Heuristic light bending used by the ray marcher.
//!
//! This is not a geodesic integrator. Each step the direction is nudged
//! towards the origin by an amount proportional to 1/r^2 and renormalised.

use glam::Vec3;

use crate::physics::constants::RADIUS_EPSILON;

/// Bend `dir` towards the origin as seen from `pos`, returning a unit vector.
#[inline]
pub fn bend_direction(pos: Vec3, dir: Vec3, strength: f32, step: f32) -> Vec3 {
    let r = pos.length().max(RADIUS_EPSILON);
    let toward_center = -pos / r;
    let accel = toward_center * (strength / (r * r));
    (dir + accel * step).normalize_or_zero()
}

/// Fraction along a segment at which the signed plane distance changes sign.
///
/// `d_prev`/`d_next` are the signed distances at the segment ends. Returns
/// `None` when both lie strictly on the same side. The fraction is in `[0, 1]`.
#[inline]
pub fn plane_crossing(d_prev: f32, d_next: f32) -> Option<f32> {
    if d_prev * d_next > 0.0 || d_prev == d_next {
        return None;
    }
    Some((d_prev / (d_prev - d_next)).clamp(0.0, 1.0))
}
