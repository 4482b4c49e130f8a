use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::constants::SEED_AXIS_MAX_COS;

/// Orthonormal frame of the (tilted) disk plane through the origin.
///
/// `u` and `v` span the plane; `normal` is perpendicular to it. In-plane
/// polar coordinates are measured in this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskFrame {
    pub normal: Vec3,
    pub u: Vec3,
    pub v: Vec3,
}

impl DiskFrame {
    /// World +Y rotated about +X by `tilt` radians.
    pub fn from_tilt(tilt: f32) -> Self {
        let normal = Vec3::new(0.0, tilt.cos(), tilt.sin());
        Self::from_normal(normal)
    }

    pub fn from_normal(normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        // Z is the primary seed; X takes over within ~8 degrees of the normal
        let seed = if normal.dot(Vec3::Z).abs() > SEED_AXIS_MAX_COS {
            Vec3::X
        } else {
            Vec3::Z
        };
        let u = normal.cross(seed).normalize();
        let v = u.cross(normal);
        Self { normal, u, v }
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p)
    }

    /// Coordinates of `p` projected onto the plane.
    #[inline]
    pub fn project(&self, p: Vec3) -> Vec2 {
        Vec2::new(self.u.dot(p), self.v.dot(p))
    }

    /// World-space vector for plane-local coordinates.
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec3 {
        self.u * local.x + self.v * local.y
    }

    /// Unit in-plane direction of rotation at `local`: the radial direction
    /// turned 90 degrees.
    #[inline]
    pub fn tangent(&self, local: Vec2) -> Vec3 {
        let radial = local.normalize_or_zero();
        self.to_world(radial.perp())
    }
}

/// Shape and look of the ray-marched disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskParams {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Tilt of the disk normal away from +Y, in degrees.
    pub tilt_degrees: f32,
    /// Spin rate of the brightness pattern, radians per second.
    pub rotation_speed: f32,
    pub color_base: Vec3,
    /// k in `1 + k * dot(-ray, tangent)`.
    pub doppler_strength: f32,
    pub band_strength: f32,
    pub band_frequency: f32,
}

impl Default for DiskParams {
    fn default() -> Self {
        Self {
            inner_radius: 4.0,
            outer_radius: 10.0,
            tilt_degrees: 27.0,
            rotation_speed: 0.5,
            color_base: Vec3::new(1.2, 0.9, 1.4),
            doppler_strength: 0.6,
            band_strength: 0.25,
            band_frequency: 6.0,
        }
    }
}

impl DiskParams {
    pub fn frame(&self) -> DiskFrame {
        DiskFrame::from_tilt(self.tilt_degrees.to_radians())
    }

    #[inline]
    pub fn contains_radius(&self, r: f32) -> bool {
        r > self.inner_radius && r < self.outer_radius
    }

    /// 1 at the inner edge, 0 at the outer edge.
    #[inline]
    pub fn radial_falloff(&self, r: f32) -> f32 {
        let span = (self.outer_radius - self.inner_radius).max(f32::EPSILON);
        (1.0 - (r - self.inner_radius) / span).clamp(0.0, 1.0)
    }
}
