//! Star colouring and the fade-trail accumulation buffer the galaxy pipeline
//! draws into before lensing.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::constants::{BRIGHTNESS_MAX, DEFAULT_WORLD_SCALE, STAR_SPEED_REFERENCE};
use crate::rendering::frame::Frame;
use crate::simulation::particles::Particles;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    /// Pixels per simulation unit.
    pub world_scale: f32,
    pub fade_color: Vec3,
    /// Blend weight of the fade colour per frame; lower keeps longer trails.
    pub fade_alpha: f32,
    pub clear_color: Vec3,
}

impl Default for TrailSettings {
    fn default() -> Self {
        let night = Vec3::new(0.0, 0.0, 10.0 / 255.0);
        Self {
            world_scale: DEFAULT_WORLD_SCALE,
            fade_color: night,
            fade_alpha: 20.0 / 255.0,
            clear_color: night,
        }
    }
}

/// Colour of one star: warm base scaled by its glow, bluer when fast.
pub fn star_color(velocity: Vec2, brightness: f32) -> Vec3 {
    let t = (velocity.length() / STAR_SPEED_REFERENCE).clamp(0.0, 1.0);
    let glow = brightness.min(BRIGHTNESS_MAX);
    let rgb = Vec3::new(220.0 * glow, 140.0 * glow, 80.0 * glow + 60.0 * t) / 255.0;
    rgb.min(Vec3::ONE)
}

/// Accumulates particle splats over time with an exponential fade.
#[derive(Debug, Clone)]
pub struct TrailCompositor {
    settings: TrailSettings,
    frame: Frame,
}

impl TrailCompositor {
    pub fn new(settings: TrailSettings, width: u32, height: u32) -> Self {
        Self {
            settings,
            frame: Frame::filled(width, height, settings.clear_color),
        }
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[inline]
    pub fn settings(&self) -> &TrailSettings {
        &self.settings
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width != self.frame.width() || height != self.frame.height() {
            log::debug!("Trail buffer resized to {}x{}", width, height);
        }
        self.frame.resize(width, height, self.settings.clear_color);
    }

    pub fn clear(&mut self) {
        self.frame.fill(self.settings.clear_color);
    }

    /// Blend the whole buffer toward the fade colour.
    pub fn fade(&mut self) {
        let a = self.settings.fade_alpha.clamp(0.0, 1.0);
        let target = self.settings.fade_color;
        for px in self.frame.pixels_mut() {
            *px = px.lerp(target, a);
        }
    }

    /// Screen position of a simulation-space point.
    #[inline]
    pub fn world_to_screen(&self, p: Vec2, center: Vec2) -> Vec2 {
        center + p * self.settings.world_scale
    }

    /// Additively draw each particle as one pixel. Off-screen particles are
    /// skipped; channels saturate at 1.
    pub fn splat(&mut self, particles: &Particles, center: Vec2) {
        let (w, h) = (self.frame.width() as f32, self.frame.height() as f32);
        for i in 0..particles.len() {
            let s = self.world_to_screen(particles.position(i), center);
            if !(s.x >= 0.0 && s.y >= 0.0 && s.x < w && s.y < h) {
                continue;
            }
            let (x, y) = (s.x as u32, s.y as u32);
            let c = star_color(particles.velocity(i), particles.brightness[i]);
            let sum = (self.frame.get(x, y) + c).min(Vec3::ONE);
            self.frame.set(x, y, sum);
        }
    }

    /// One frame of trail accumulation.
    pub fn accumulate(&mut self, particles: &Particles, center: Vec2) {
        self.fade();
        self.splat(particles, center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_color_slow_and_dim() {
        let c = star_color(Vec2::ZERO, 0.5);
        assert!((c.x - 110.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 70.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 40.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_star_color_saturates() {
        let c = star_color(Vec2::new(100.0, 0.0), 5.0);
        assert_eq!(c.x, 1.0);
        assert_eq!(c.y, 1.0);
        assert!((c.z - 220.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_faster_is_bluer() {
        let slow = star_color(Vec2::new(0.5, 0.0), 0.6);
        let fast = star_color(Vec2::new(5.0, 0.0), 0.6);
        assert_eq!(slow.x, fast.x);
        assert!(fast.z > slow.z);
    }

    #[test]
    fn test_fade_converges_to_fade_color() {
        let mut t = TrailCompositor::new(TrailSettings::default(), 4, 4);
        t.frame.fill(Vec3::ONE);
        for _ in 0..2000 {
            t.fade();
        }
        let target = t.settings().fade_color;
        assert!(t.frame().pixels().iter().all(|c| (*c - target).length() < 1e-3));
    }

    #[test]
    fn test_splat_centre_and_skips_offscreen() {
        let settings = TrailSettings {
            clear_color: Vec3::ZERO,
            ..Default::default()
        };
        let mut t = TrailCompositor::new(settings, 20, 10);
        let mut p = Particles::with_len(2);
        p.set(0, Vec2::ZERO, Vec2::ZERO, 1.0);
        p.set(1, Vec2::new(100.0, 0.0), Vec2::ZERO, 1.0);
        t.splat(&p, Vec2::new(10.0, 5.0));

        let lit: Vec<_> = t
            .frame()
            .pixels()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.max_element() > 0.0)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lit, vec![5 * 20 + 10]);
    }

    #[test]
    fn test_splat_saturates() {
        let mut t = TrailCompositor::new(TrailSettings::default(), 3, 3);
        let mut p = Particles::with_len(10);
        for i in 0..10 {
            p.set(i, Vec2::ZERO, Vec2::ZERO, 2.0);
        }
        t.splat(&p, Vec2::new(1.5, 1.5));
        assert!(t.frame().get(1, 1).max_element() <= 1.0);
        assert_eq!(t.frame().get(1, 1).x, 1.0);
    }

    #[test]
    fn test_world_to_screen_scale() {
        let t = TrailCompositor::new(TrailSettings::default(), 8, 8);
        let s = t.world_to_screen(Vec2::new(1.0, -2.0), Vec2::new(400.0, 300.0));
        assert_eq!(s, Vec2::new(412.0, 276.0));
    }
}
