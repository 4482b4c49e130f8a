use crate::config::ConfigError;
use crate::physics::constants::*;
use crate::physics::{bend_direction, plane_crossing};
use crate::rendering::camera::Camera;
use crate::rendering::disk::{DiskFrame, DiskParams};
use crate::rendering::frame::Frame;
use glam::{Vec2, Vec3};
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RayMarchSettings {
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub fov_degrees: f32,
    /// Internal resolution as a fraction of the window.
    pub render_scale: f32,
    pub bh_radius: f32,
    pub bending_strength: f32,
    pub step_size: f32,
    pub max_steps: u32,
    pub max_distance: f32,
    pub background: Vec3,
    pub disk: DiskParams,
}

impl Default for RayMarchSettings {
    fn default() -> Self {
        Self {
            camera_position: Vec3::new(0.0, 1.0, 12.0),
            camera_target: Vec3::ZERO,
            fov_degrees: 55.0,
            render_scale: 0.5,
            bh_radius: 3.0,
            bending_strength: DEFAULT_BENDING_STRENGTH,
            step_size: DEFAULT_MARCH_STEP,
            max_steps: MAX_MARCH_STEPS,
            max_distance: MAX_TRAVEL_DISTANCE,
            background: Vec3::ZERO,
            disk: DiskParams::default(),
        }
    }
}

impl RayMarchSettings {
    pub fn camera(&self) -> Camera {
        Camera::new(self.camera_position, self.camera_target, self.fov_degrees)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step_size > 0.0 && self.step_size.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "ray march step must be positive, got {}",
                self.step_size
            )));
        }
        if !(self.render_scale > 0.0 && self.render_scale <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "render scale must be in (0, 1], got {}",
                self.render_scale
            )));
        }
        if self.bh_radius < 0.0 || self.max_distance <= self.bh_radius {
            return Err(ConfigError::Invalid(
                "need 0 <= black hole radius < max distance".into(),
            ));
        }
        if self.disk.inner_radius >= self.disk.outer_radius {
            return Err(ConfigError::Invalid(format!(
                "disk inner radius {} must be below outer radius {}",
                self.disk.inner_radius, self.disk.outer_radius
            )));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov must be in (0, 180) degrees, got {}",
                self.fov_degrees
            )));
        }
        if (self.camera_target - self.camera_position).length_squared() == 0.0 {
            return Err(ConfigError::Invalid("camera target equals camera position".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskHit {
    pub position: Vec3,
    pub radius: f32,
    /// Plane-local coordinates of the hit.
    pub local: Vec2,
    /// Ray direction when it crossed the plane.
    pub direction: Vec3,
    pub steps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarchOutcome {
    Captured { steps: u32 },
    Escaped { steps: u32 },
    DiskHit(DiskHit),
}

/// March one ray through the bending field until it is captured, leaves the
/// scene, or crosses the disk between its inner and outer radius.
pub fn march_ray(
    origin: Vec3,
    dir: Vec3,
    settings: &RayMarchSettings,
    frame: &DiskFrame,
) -> MarchOutcome {
    let step = settings.step_size;
    let mut pos = origin;
    let mut dir = dir.normalize_or_zero();

    for i in 0..settings.max_steps {
        let r = pos.length();
        if r < settings.bh_radius {
            return MarchOutcome::Captured { steps: i };
        }
        if r > settings.max_distance {
            return MarchOutcome::Escaped { steps: i };
        }

        let next = pos + dir * step;
        let d_prev = frame.signed_distance(pos);
        let d_next = frame.signed_distance(next);
        if let Some(t) = plane_crossing(d_prev, d_next) {
            let hit = pos.lerp(next, t);
            let local = frame.project(hit);
            let radius = local.length();
            if settings.disk.contains_radius(radius) {
                return MarchOutcome::DiskHit(DiskHit {
                    position: hit,
                    radius,
                    local,
                    direction: dir,
                    steps: i,
                });
            }
        }

        dir = bend_direction(pos, dir, settings.bending_strength, step);
        pos += dir * step;
    }
    MarchOutcome::Escaped {
        steps: settings.max_steps,
    }
}

/// Colour of a disk hit at time `time` (seconds).
pub fn shade_disk_hit(hit: &DiskHit, disk: &DiskParams, frame: &DiskFrame, time: f32) -> Vec3 {
    let angle = hit.local.y.atan2(hit.local.x);
    let phase = angle + time * disk.rotation_speed;

    let radial = disk.radial_falloff(hit.radius);
    let tangent = frame.tangent(hit.local);
    // side of the disk moving towards the viewer is boosted
    let doppler = (1.0 + disk.doppler_strength * (-hit.direction).dot(tangent)).max(0.0);
    let band = (1.0 + disk.band_strength * (disk.band_frequency * phase).sin()).max(0.0);

    disk.color_base * radial * doppler * band
}

pub struct RayMarcher {
    pub camera: Arc<RwLock<Camera>>,
    settings: RayMarchSettings,
    disk_frame: DiskFrame,
    last_camera_version: AtomicU64,
    cached_dims: AtomicU64, // (w<<32)|h
    ray_cache: RwLock<Vec<Vec3>>, // cached directions
}

impl RayMarcher {
    pub fn new(camera: Arc<RwLock<Camera>>, settings: RayMarchSettings) -> Self {
        Self {
            camera,
            disk_frame: settings.disk.frame(),
            settings,
            last_camera_version: AtomicU64::new(0),
            cached_dims: AtomicU64::new(0),
            ray_cache: RwLock::new(Vec::new()),
        }
    }

    #[inline]
    pub fn settings(&self) -> &RayMarchSettings {
        &self.settings
    }

    #[inline]
    pub fn disk_frame(&self) -> &DiskFrame {
        &self.disk_frame
    }

    /// Change the disk tilt; the plane frame is rebuilt.
    pub fn set_tilt_degrees(&mut self, degrees: f32) {
        self.settings.disk.tilt_degrees = degrees;
        self.disk_frame = self.settings.disk.frame();
    }

    /// Colour seen along one ray.
    pub fn shade_ray(&self, origin: Vec3, dir: Vec3, time: f32) -> Vec3 {
        match march_ray(origin, dir, &self.settings, &self.disk_frame) {
            MarchOutcome::DiskHit(hit) => {
                shade_disk_hit(&hit, &self.settings.disk, &self.disk_frame, time)
            }
            // captured and escaped rays look the same
            MarchOutcome::Captured { .. } | MarchOutcome::Escaped { .. } => {
                self.settings.background
            }
        }
    }

    /// Shade every pixel of `frame`. Pixels are independent; rows run in
    /// parallel.
    pub fn render_frame(&self, frame: &mut Frame, time: f32) {
        let width = frame.width();
        let height = frame.height();
        if width == 0 || height == 0 {
            return;
        }
        let cam = self.camera.read();
        self.refresh_ray_cache(&cam, width, height);
        let cache = self.ray_cache.read();
        let rays: &[Vec3] = &cache;
        let origin = cam.position;

        frame
            .pixels_mut()
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let base = y * width as usize;
                for (x, px) in row.iter_mut().enumerate() {
                    *px = self.shade_ray(origin, rays[base + x], time);
                }
            });
    }

    /// Rebuild primary ray directions when the camera or resolution changed.
    fn refresh_ray_cache(&self, cam: &Camera, width: u32, height: u32) {
        let packed_dims = ((width as u64) << 32) | height as u64;
        let stale = self.last_camera_version.load(Ordering::Relaxed) != cam.version
            || self.cached_dims.load(Ordering::Relaxed) != packed_dims;
        if !stale {
            return;
        }
        let mut cache = self.ray_cache.write();
        cache.clear();
        cache.reserve((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cache.push(cam.pixel_ray(x, y, width, height).1);
            }
        }
        self.last_camera_version.store(cam.version, Ordering::Relaxed);
        self.cached_dims.store(packed_dims, Ordering::Relaxed);
        log::debug!("Rebuilt ray cache for {}x{} (camera v{})", width, height, cam.version);
    }
}
