use serde::{Deserialize, Serialize};

use crate::physics::constants::*;

/// Point mass with a softened Newtonian pull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlackHole {
    pub g: f32,         // gravitational constant (sim units)
    pub mass: f32,
    pub softening: f32, // keeps the pull finite at r -> 0
}

impl BlackHole {
    pub fn new(g: f32, mass: f32, softening: f32) -> Self {
        BlackHole { g, mass, softening }
    }

    #[inline]
    pub fn gm(&self) -> f32 {
        self.g * self.mass
    }

    /// Magnitude of the acceleration towards the hole at distance `r`.
    #[inline]
    pub fn acceleration(&self, r: f32) -> f32 {
        self.gm() / (r * r + self.softening)
    }

    /// Speed of a circular orbit at `r`.
    #[inline]
    pub fn circular_speed(&self, r: f32) -> f32 {
        (self.gm() / (r + self.softening)).max(0.0).sqrt()
    }
}

impl Default for BlackHole {
    fn default() -> Self {
        Self::new(DEFAULT_G, DEFAULT_BH_MASS, DEFAULT_SOFTENING)
    }
}

/// Dark matter halo with a flat rotation curve of speed `v0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Halo {
    pub v0: f32,
    pub core_radius: f32,
}

impl Halo {
    pub fn new(v0: f32, core_radius: f32) -> Self {
        Halo { v0, core_radius }
    }

    #[inline]
    pub fn acceleration(&self, r: f32) -> f32 {
        self.v0 * self.v0 / (r + self.core_radius)
    }

    /// The halo contributes the same speed at every radius.
    #[inline]
    pub fn circular_speed(&self, _r: f32) -> f32 {
        self.v0
    }
}

impl Default for Halo {
    fn default() -> Self {
        Self::new(DEFAULT_HALO_V0, DEFAULT_HALO_CORE)
    }
}

/// Combined central field felt by every disk particle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GravityField {
    pub black_hole: BlackHole,
    pub halo: Halo,
}

impl GravityField {
    pub fn new(black_hole: BlackHole, halo: Halo) -> Self {
        Self { black_hole, halo }
    }

    /// Total inward acceleration magnitude at `r`.
    #[inline]
    pub fn acceleration(&self, r: f32) -> f32 {
        self.black_hole.acceleration(r) + self.halo.acceleration(r)
    }

    /// Circular speed with both components added in quadrature.
    #[inline]
    pub fn circular_speed(&self, r: f32) -> f32 {
        let v_bh = self.black_hole.circular_speed(r);
        let v_dm = self.halo.circular_speed(r);
        (v_bh * v_bh + v_dm * v_dm).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_speed_quadrature() {
        let field = GravityField::default();
        let r = 10.0;
        let v_bh = (2.0f32 * 400.0 / (10.0 + 0.5)).sqrt();
        let expected = (v_bh * v_bh + 2.2 * 2.2).sqrt();
        assert!((field.circular_speed(r) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_acceleration_finite_at_center() {
        let field = GravityField::default();
        let a = field.acceleration(0.0);
        assert!(a.is_finite());
        // softening bounds the black hole term by G*M/softening
        assert!(a <= 2.0 * 400.0 / 0.5 + 2.2 * 2.2 / 1.2 + 1e-3);
    }

    #[test]
    fn test_halo_speed_is_flat() {
        let halo = Halo::default();
        assert_eq!(halo.circular_speed(1.0), halo.circular_speed(100.0));
    }

    #[test]
    fn test_acceleration_decreases_outward() {
        let field = GravityField::default();
        assert!(field.acceleration(5.0) > field.acceleration(10.0));
        assert!(field.acceleration(10.0) > field.acceleration(30.0));
    }
}
