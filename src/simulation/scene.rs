use crate::config::{AppConfig, PipelineMode};
use crate::rendering::frame::Frame;
use crate::rendering::lensing::LensingRenderer;
use crate::rendering::ray_marcher::RayMarcher;
use crate::rendering::trails::TrailCompositor;
use crate::rendering::Camera;
use crate::simulation::galaxy::GalaxySim;
use crate::simulation::{InputState, TimeState};
use glam::{Vec2, Vec3};
use parking_lot::RwLock;
use std::sync::Arc;
use winit::event::WindowEvent;

/// Seed used after a reseed request; a fixed mix of the previous seed so a
/// run is reproducible from its starting seed.
pub fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407)
}

/// Internal ray-march resolution for a window size.
pub fn scaled_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let s = |v: u32| ((v as f32 * scale).round() as u32).max(1);
    (s(width), s(height))
}

pub struct Scene {
    pub mode: PipelineMode,
    pub camera: Arc<RwLock<Camera>>,
    pub time: TimeState,
    pub input: InputState,
    pub last_fps: Option<f32>,
    pub paused: bool,
    particle_count: usize,
    galaxy: GalaxySim,
    trails: TrailCompositor,
    lensing: LensingRenderer,
    lensed: Frame,
    ray_marcher: RayMarcher,
    marched: Frame,
    width: u32,
    height: u32,
}

impl Scene {
    pub fn new(config: &AppConfig, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let camera = Arc::new(RwLock::new(config.ray_march.camera()));
        let ray_marcher = RayMarcher::new(camera.clone(), config.ray_march);
        let (mw, mh) = scaled_size(width, height, config.ray_march.render_scale);

        let mut galaxy = GalaxySim::new(config.simulation, config.seed);
        galaxy.initialize(config.particle_count);

        Self {
            mode: config.mode,
            camera,
            time: TimeState::default(),
            input: InputState::default(),
            last_fps: None,
            paused: false,
            particle_count: config.particle_count,
            galaxy,
            trails: TrailCompositor::new(config.trails, width, height),
            lensing: LensingRenderer::new(config.lensing),
            lensed: Frame::new(width, height),
            ray_marcher,
            marched: Frame::new(mw, mh),
            width,
            height,
        }
    }

    #[inline]
    pub fn galaxy(&self) -> &GalaxySim {
        &self.galaxy
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Screen position of the black hole.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * 0.5
    }

    pub fn should_exit(&self) -> bool {
        self.input.quit
    }

    /// Consume input requests, advance the clock and step the active
    /// pipeline's simulation.
    pub fn update(&mut self) {
        if std::mem::take(&mut self.input.toggle_pause) {
            self.paused = !self.paused;
            log::info!("{}", if self.paused { "Paused" } else { "Resumed" });
        }
        if std::mem::take(&mut self.input.switch_mode) {
            self.mode = self.mode.toggled();
            log::info!("Switched to {:?} pipeline", self.mode);
        }
        if std::mem::take(&mut self.input.reseed) {
            let seed = next_seed(self.galaxy.seed());
            self.galaxy.reseed(seed);
            self.trails.clear();
            log::info!("Reseeded {} particles with seed {}", self.particle_count, seed);
        }

        self.time.update(self.paused);
        if !self.paused && self.mode == PipelineMode::Galaxy {
            self.galaxy.step();
        }

        if let Some(fps) = self.time.fps_sample() {
            let stats = self.galaxy.radius_stats();
            log::info!(
                "FPS: {:.1}  mean radius: {:.2}  recycled: {}",
                fps,
                stats.mean,
                self.galaxy.recycled()
            );
            self.last_fps = Some(fps);
        }
    }

    /// Produce the frame for the active pipeline.
    pub fn render(&mut self) -> &Frame {
        match self.mode {
            PipelineMode::Galaxy => {
                let center = self.center();
                self.trails.accumulate(self.galaxy.particles(), center);
                self.lensing
                    .render(self.trails.frame(), &mut self.lensed, center);
                &self.lensed
            }
            PipelineMode::RayMarch => {
                self.ray_marcher
                    .render_frame(&mut self.marched, self.time.current_time);
                &self.marched
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.trails.resize(width, height);
        self.lensed.resize(width, height, Vec3::ZERO);
        let (mw, mh) = scaled_size(width, height, self.ray_marcher.settings().render_scale);
        self.marched.resize(mw, mh, Vec3::ZERO);
        log::debug!("Scene resized to {}x{} (ray march {}x{})", width, height, mw, mh);
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => self.input.handle_keyboard(event),
            WindowEvent::CloseRequested => self.input.quit = true,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    fn small_config() -> AppConfig {
        AppConfig {
            particle_count: 300,
            ..Default::default()
        }
    }

    #[test]
    fn test_galaxy_frame_has_black_center() {
        let mut scene = Scene::new(&small_config(), 320, 240);
        for _ in 0..5 {
            scene.update();
        }
        let frame = scene.render();
        assert_eq!((frame.width(), frame.height()), (320, 240));
        assert_eq!(frame.get(160, 120), Vec3::ZERO);
        assert!(frame.pixels().iter().any(|c| c.max_element() > 0.0));
    }

    #[test]
    fn test_mode_switch_uses_scaled_frame() {
        let mut scene = Scene::new(&small_config(), 64, 48);
        scene.input.handle_key(KeyCode::KeyM, true);
        scene.update();
        assert_eq!(scene.mode, PipelineMode::RayMarch);
        let frame = scene.render();
        assert_eq!((frame.width(), frame.height()), (32, 24));
    }

    #[test]
    fn test_pause_freezes_particles() {
        let mut scene = Scene::new(&small_config(), 64, 48);
        scene.input.handle_key(KeyCode::KeyP, true);
        scene.update();
        assert!(scene.paused);
        let before = scene.galaxy().particles().clone();
        scene.update();
        scene.update();
        assert_eq!(scene.galaxy().particles(), &before);
        assert_eq!(scene.galaxy().steps(), 0);
    }

    #[test]
    fn test_reseed_changes_population() {
        let mut scene = Scene::new(&small_config(), 64, 48);
        let first_seed = scene.galaxy().seed();
        scene.input.handle_key(KeyCode::KeyR, true);
        scene.update();
        assert_eq!(scene.galaxy().seed(), next_seed(first_seed));
        assert_eq!(scene.galaxy().particles().len(), 300);
        assert!(!scene.input.reseed);
    }

    #[test]
    fn test_resize_reallocates_frames() {
        let mut scene = Scene::new(&small_config(), 64, 48);
        scene.resize(100, 50);
        assert_eq!(scene.size(), (100, 50));
        assert_eq!(scene.center(), Vec2::new(50.0, 25.0));
        let frame = scene.render();
        assert_eq!((frame.width(), frame.height()), (100, 50));
    }

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size(1280, 720, 0.5), (640, 360));
        assert_eq!(scaled_size(1, 1, 0.25), (1, 1));
    }
}
