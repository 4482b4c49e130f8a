//! Simulation module for scene management and the particle disk
//!
//! This module owns everything that evolves over time: the disk particles,
//! the per-frame orchestration of both pipelines, user input and the clock.

pub mod galaxy;
pub mod params;
pub mod particles;
pub mod scene;

pub use galaxy::GalaxySim;
pub use params::{DiskModel, SimulationParameters};
pub use particles::{Particles, RadiusStats};
pub use scene::Scene;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// One-shot requests raised by key presses, consumed by [`Scene::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub reseed: bool,
    pub switch_mode: bool,
    pub toggle_pause: bool,
    pub quit: bool,
}

impl InputState {
    pub fn handle_keyboard(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(keycode) = event.physical_key {
            self.handle_key(keycode, event.state == ElementState::Pressed);
        }
    }

    pub fn handle_key(&mut self, keycode: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }
        match keycode {
            KeyCode::KeyR => self.reseed = true,
            KeyCode::KeyM => self.switch_mode = true,
            KeyCode::KeyP => self.toggle_pause = true,
            KeyCode::Escape => self.quit = true,
            _ => {}
        }
    }
}

/// Time management for animations and physics
#[derive(Debug, Clone)]
pub struct TimeState {
    pub current_time: f32,
    pub delta_time: f32,
    pub last_frame_time: std::time::Instant,
    pub simulation_speed: f32,
    pub frame_count: u64,
    pub last_fps_instant: std::time::Instant,
}

impl Default for TimeState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            delta_time: 0.0,
            last_frame_time: std::time::Instant::now(),
            simulation_speed: 1.0,
            frame_count: 0,
            last_fps_instant: std::time::Instant::now(),
        }
    }
}

impl TimeState {
    /// Advance the clock. While paused frames are still counted but no
    /// simulation time passes.
    pub fn update(&mut self, paused: bool) {
        let now = std::time::Instant::now();
        let wall = now.duration_since(self.last_frame_time).as_secs_f32();
        self.delta_time = if paused {
            0.0
        } else {
            wall * self.simulation_speed
        };
        self.current_time += self.delta_time;
        self.last_frame_time = now;
        self.frame_count += 1;
    }

    pub fn fps_sample(&mut self) -> Option<f32> {
        let now = std::time::Instant::now();
        let elapsed = now.duration_since(self.last_fps_instant).as_secs_f32();
        if elapsed >= 1.0 {
            let fps = self.frame_count as f32 / elapsed;
            self.frame_count = 0;
            self.last_fps_instant = now;
            Some(fps)
        } else {
            None
        }
    }
}
