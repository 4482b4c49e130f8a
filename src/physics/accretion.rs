//! Viscous heating and damping of disk particles.
//!
//! A crude discrete stand-in for an accretion disk: friction is strongest
//! near the centre, it turns kinetic energy into glow, and the lost speed makes
//! orbits decay inward over many steps.

use glam::Vec2;

use crate::physics::constants::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccretionModel {
    pub viscosity_base: f32,
    pub viscosity_core: f32,
    pub viscosity_ceiling: f32,
    pub heat_scale: f32,
    pub cooling: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
}

impl Default for AccretionModel {
    fn default() -> Self {
        Self {
            viscosity_base: DEFAULT_VISCOSITY_BASE,
            viscosity_core: DEFAULT_VISCOSITY_CORE,
            viscosity_ceiling: MAX_VISCOSITY,
            heat_scale: DEFAULT_HEAT_SCALE,
            cooling: DEFAULT_BRIGHTNESS_COOL,
            brightness_min: BRIGHTNESS_MIN,
            brightness_max: BRIGHTNESS_MAX,
        }
    }
}

impl AccretionModel {
    /// Effective viscosity at distance `r`, capped at the ceiling.
    #[inline]
    pub fn viscosity(&self, r: f32) -> f32 {
        (self.viscosity_base / (r + self.viscosity_core)).min(self.viscosity_ceiling)
    }

    #[inline]
    pub fn heat(&self, viscosity: f32, speed2: f32) -> f32 {
        self.heat_scale * viscosity * speed2
    }

    /// Heat, damp and cool one particle. `r` is its pre-step distance.
    ///
    /// Brightness leaves this function inside `[brightness_min, brightness_max]`.
    pub fn apply(&self, r: f32, velocity: &mut Vec2, brightness: &mut f32) {
        let eta = self.viscosity(r);
        let heated = *brightness + self.heat(eta, velocity.length_squared());
        let heated = heated.min(self.brightness_max);
        *velocity *= 1.0 - eta;
        *brightness = self.clamp_brightness(heated * self.cooling);
    }

    /// NaN maps to the floor.
    #[inline]
    pub fn clamp_brightness(&self, b: f32) -> f32 {
        if b.is_nan() {
            return self.brightness_min;
        }
        b.clamp(self.brightness_min, self.brightness_max)
    }
}
