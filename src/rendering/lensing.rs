//! Screen-space lensing post-process.
//!
//! Each output pixel reads the source image at a warped position (radial
//! pull, frame-drag shear, vertical bulge), then gets a photon ring, a black
//! horizon disc and left/right Doppler brightening. All lengths are pixels.

use glam::{Vec2, Vec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::physics::constants::PHOTON_SPHERE_FACTOR;
use crate::rendering::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LensingParameters {
    pub lens_strength: f32,
    /// Soft core of the radial term, px^2.
    pub lens_softening: f32,
    pub shear_strength: f32,
    /// Soft core of the shear term; much larger than the radial one so shear
    /// only shows at moderate radii.
    pub shear_softening: f32,
    pub vertical_warp_strength: f32,
    pub vertical_warp_falloff: f32,
    pub ring_radius: f32,
    pub ring_width: f32,
    pub ring_boost: f32,
    /// > 1 stretches the ring vertically.
    pub ring_eccentricity: f32,
    /// Horizon radius as a fraction of the ring radius.
    pub horizon_fraction: f32,
    pub doppler_boost: f32,
    /// Width of the fade band along the image border.
    pub edge_fade: f32,
    pub tint: Vec3,
}

impl Default for LensingParameters {
    fn default() -> Self {
        Self {
            lens_strength: 18_000.0,
            lens_softening: 50.0,
            shear_strength: 9_000.0,
            shear_softening: 4_000.0,
            vertical_warp_strength: 40.0,
            vertical_warp_falloff: 260.0,
            ring_radius: 110.0,
            ring_width: 3.0,
            ring_boost: 3.5,
            ring_eccentricity: 1.4,
            horizon_fraction: 1.0 / PHOTON_SPHERE_FACTOR,
            doppler_boost: 0.7,
            edge_fade: 24.0,
            tint: Vec3::new(1.1, 1.05, 0.95),
        }
    }
}

impl LensingParameters {
    /// Parameters that leave the source untouched apart from the horizon.
    pub fn passthrough() -> Self {
        Self {
            lens_strength: 0.0,
            shear_strength: 0.0,
            vertical_warp_strength: 0.0,
            ring_boost: 0.0,
            doppler_boost: 0.0,
            tint: Vec3::ONE,
            ..Default::default()
        }
    }

    #[inline]
    pub fn horizon_radius(&self) -> f32 {
        self.ring_radius * self.horizon_fraction
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.lens_strength,
            self.lens_softening,
            self.shear_strength,
            self.shear_softening,
            self.vertical_warp_strength,
            self.vertical_warp_falloff,
            self.ring_radius,
            self.ring_width,
            self.ring_boost,
            self.ring_eccentricity,
            self.horizon_fraction,
            self.doppler_boost,
            self.edge_fade,
        ];
        if values.iter().any(|v| !v.is_finite()) || !self.tint.is_finite() {
            return Err(ConfigError::Invalid("lensing parameters must be finite".into()));
        }
        if self.lens_softening <= 0.0 || self.shear_softening <= 0.0 {
            return Err(ConfigError::Invalid("lensing softening must be positive".into()));
        }
        if self.ring_width <= 0.0 || self.ring_eccentricity <= 0.0 || self.vertical_warp_falloff <= 0.0 {
            return Err(ConfigError::Invalid(
                "ring width, ring eccentricity and warp falloff must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.horizon_fraction) {
            return Err(ConfigError::Invalid(format!(
                "horizon fraction must be in [0, 1), got {}",
                self.horizon_fraction
            )));
        }
        Ok(())
    }
}

/// Where pixel `pixel` reads from, before clamping. `center` is the black
/// hole's screen position.
pub fn warp_sample_position(pixel: Vec2, center: Vec2, p: &LensingParameters) -> Vec2 {
    let offset = pixel - center;
    let r2 = offset.length_squared();
    let r = r2.sqrt();
    let dir = if r > 0.0 { offset / r } else { Vec2::ZERO };

    let radial = -dir * (p.lens_strength / (r2 + p.lens_softening));
    let shear = dir.perp() * (p.shear_strength / (r2 + p.shear_softening));
    let angle = offset.y.atan2(offset.x);
    let bulge = p.vertical_warp_strength * (-r / p.vertical_warp_falloff).exp() * angle.sin();

    pixel + radial + shear + Vec2::new(0.0, bulge)
}

/// Photon ring intensity for the raw (unwarped) offset from the centre.
#[inline]
pub fn photon_ring_glow(offset: Vec2, p: &LensingParameters) -> f32 {
    let stretched = Vec2::new(offset.x, offset.y / p.ring_eccentricity);
    (-(stretched.length() - p.ring_radius).abs() / p.ring_width).exp()
}

/// 0 outside the image, rising smoothly to 1 at `width` pixels inside.
#[inline]
pub fn edge_fade(sample: Vec2, size: Vec2, width: f32) -> f32 {
    if width <= 0.0 {
        return 1.0;
    }
    let d = sample.x.min(sample.y).min(size.x - sample.x).min(size.y - sample.y);
    smoothstep(0.0, width, d)
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Final colour of one pixel (pixel-space centre coordinates).
pub fn lens_pixel(src: &Frame, pixel: Vec2, center: Vec2, p: &LensingParameters) -> Vec3 {
    let offset = pixel - center;
    let r = offset.length();
    // the horizon always wins over anything drawn on top of it
    if r < p.horizon_radius() {
        return Vec3::ZERO;
    }

    let sample = warp_sample_position(pixel, center, p);
    let fade = edge_fade(sample, src.size(), p.edge_fade);
    let mut color = src.sample_bilinear(sample) * fade;

    color += Vec3::splat(photon_ring_glow(offset, p) * p.ring_boost);

    let angle = offset.y.atan2(offset.x);
    let doppler = (1.0 + p.doppler_boost * angle.cos()).max(0.0);
    color * doppler * p.tint
}

#[derive(Debug, Clone, Default)]
pub struct LensingRenderer {
    pub params: LensingParameters,
}

impl LensingRenderer {
    pub fn new(params: LensingParameters) -> Self {
        Self { params }
    }

    /// Lens `src` into `dst` (resized to match). Rows run in parallel.
    pub fn render(&self, src: &Frame, dst: &mut Frame, center: Vec2) {
        dst.resize(src.width(), src.height(), Vec3::ZERO);
        let width = src.width() as usize;
        if width == 0 {
            return;
        }
        let params = &self.params;
        dst.pixels_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    *px = lens_pixel(src, pixel, center, params);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pattern(w: u32, h: u32) -> Frame {
        let mut f = Frame::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = ((x * 7 + y * 13) % 17) as f32 / 17.0;
                f.set(x, y, Vec3::new(v, 1.0 - v, 0.5));
            }
        }
        f
    }

    #[test]
    fn test_zero_strength_is_direct_sample() {
        let src = pattern(64, 48);
        let p = LensingParameters {
            ring_radius: 9.0,
            edge_fade: 4.0,
            ..LensingParameters::passthrough()
        };
        let center = Vec2::new(32.0, 24.0);
        let mut dst = Frame::new(1, 1);
        LensingRenderer::new(p).render(&src, &mut dst, center);
        for y in 4..44 {
            for x in 4..60 {
                let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if (pixel - center).length() < p.horizon_radius() {
                    continue;
                }
                let d = (dst.get(x, y) - src.get(x, y)).abs().max_element();
                assert!(d < 1e-6, "pixel ({}, {}) differs by {}", x, y, d);
            }
        }
    }

    #[test]
    fn test_warp_is_identity_without_strength() {
        let p = LensingParameters::passthrough();
        let pixel = Vec2::new(140.5, 33.5);
        assert_eq!(warp_sample_position(pixel, Vec2::new(100.0, 100.0), &p), pixel);
    }

    #[test]
    fn test_radial_warp_pulls_towards_center() {
        let p = LensingParameters {
            shear_strength: 0.0,
            vertical_warp_strength: 0.0,
            ..Default::default()
        };
        let center = Vec2::new(100.0, 100.0);
        let pixel = Vec2::new(150.0, 100.0);
        let s = warp_sample_position(pixel, center, &p);
        assert!(s.x < pixel.x);
        assert!((s.y - pixel.y).abs() < 1e-4);
    }

    #[test]
    fn test_shear_is_tangential_and_weak_near_center() {
        let p = LensingParameters {
            lens_strength: 0.0,
            vertical_warp_strength: 0.0,
            ..Default::default()
        };
        let center = Vec2::ZERO;
        let s = warp_sample_position(Vec2::new(60.0, 0.0), center, &p);
        assert!((s.x - 60.0).abs() < 1e-4);
        assert!(s.y > 0.0);
        // the large soft core caps displacement at strength / softening
        let near = warp_sample_position(Vec2::new(0.5, 0.0), center, &p);
        assert!(near.y <= p.shear_strength / p.shear_softening + 1e-4);
    }

    #[test]
    fn test_ring_peaks_at_ring_radius() {
        let p = LensingParameters::default();
        let on = photon_ring_glow(Vec2::new(p.ring_radius, 0.0), &p);
        let off = photon_ring_glow(Vec2::new(p.ring_radius + 10.0, 0.0), &p);
        assert!((on - 1.0).abs() < 1e-6);
        assert!(off < 0.1);
        // stretched vertically by the eccentricity
        let top = photon_ring_glow(Vec2::new(0.0, p.ring_radius * p.ring_eccentricity), &p);
        assert!((top - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_ring_drawn_outside_horizon() {
        let p = LensingParameters::default();
        assert!(p.ring_radius > p.horizon_radius());
        let src = Frame::new(400, 300);
        let center = Vec2::new(200.0, 150.0);
        let on_ring = lens_pixel(&src, center + Vec2::new(0.0, p.ring_radius * p.ring_eccentricity), center, &p);
        assert!(on_ring.max_element() > 1.0);
    }

    #[test]
    fn test_doppler_brightens_right_side() {
        let src = Frame::filled(400, 300, Vec3::splat(0.5));
        let p = LensingParameters {
            doppler_boost: 0.7,
            ..LensingParameters::passthrough()
        };
        let center = Vec2::new(200.0, 150.0);
        let right = lens_pixel(&src, center + Vec2::new(120.0, 0.0), center, &p);
        let left = lens_pixel(&src, center - Vec2::new(120.0, 0.0), center, &p);
        assert!((right.x - 0.85).abs() < 1e-4);
        assert!((left.x - 0.15).abs() < 1e-4);
    }

    #[test]
    fn test_extreme_warp_stays_finite_and_fades() {
        let src = Frame::filled(64, 64, Vec3::ONE);
        let p = LensingParameters {
            lens_strength: 1e9,
            ring_boost: 0.0,
            doppler_boost: 0.0,
            tint: Vec3::ONE,
            ring_radius: 4.0,
            ..Default::default()
        };
        let c = lens_pixel(&src, Vec2::new(60.5, 32.5), Vec2::new(32.0, 32.0), &p);
        assert!(c.is_finite());
        assert!(c.max_element() <= 1.0);
    }

    #[test]
    fn test_edge_fade() {
        let size = Vec2::new(100.0, 100.0);
        assert_eq!(edge_fade(Vec2::new(50.0, 50.0), size, 10.0), 1.0);
        assert_eq!(edge_fade(Vec2::new(-5.0, 50.0), size, 10.0), 0.0);
        let mid = edge_fade(Vec2::new(5.0, 50.0), size, 10.0);
        assert!((mid - 0.5).abs() < 1e-6);
        assert_eq!(edge_fade(Vec2::new(0.0, 0.0), size, 0.0), 1.0);
    }

    #[test]
    fn test_defaults_validate() {
        assert!(LensingParameters::default().validate().is_ok());
        let bad = LensingParameters {
            ring_width: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_inside_horizon_is_black(
            r_frac in 0.0f32..0.999,
            angle in 0.0f32..6.283,
            boost in 0.0f32..50.0,
        ) {
            let src = Frame::filled(320, 240, Vec3::splat(5.0));
            let p = LensingParameters {
                ring_boost: boost,
                ring_radius: 90.0,
                ring_width: 40.0,
                ..Default::default()
            };
            let center = Vec2::new(160.0, 120.0);
            let r = p.horizon_radius() * r_frac;
            let pixel = center + Vec2::new(angle.cos(), angle.sin()) * r;
            prop_assert_eq!(lens_pixel(&src, pixel, center, &p), Vec3::ZERO);
        }
    }
}
