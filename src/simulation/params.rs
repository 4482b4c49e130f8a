use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::physics::constants::*;
use crate::physics::{AccretionModel, BlackHole, GravityField, Halo};

/// Which physics the disk particles feel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiskModel {
    /// Gravity only.
    Orbital,
    /// Gravity plus viscous heating, damping and cool-down.
    Accretion,
}

/// Per-run disk configuration, read-only while stepping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub g: f32,
    pub bh_mass: f32,
    pub softening: f32,
    pub halo_v0: f32,
    pub halo_core_radius: f32,
    pub dt: f32,

    pub model: DiskModel,
    pub viscosity_base: f32,
    pub viscosity_core: f32,
    pub viscosity_ceiling: f32,
    pub heat_scale: f32,
    pub brightness_cool: f32,
    pub brightness_min: f32,
    pub brightness_max: f32,
    pub horizon_radius: f32,
    pub respawn_r_min: f32,
    pub respawn_r_max: f32,
    pub fresh_brightness: f32,

    pub init_r_min: f32,
    pub init_r_max: f32,
    pub launch_boost: f32,
    pub respawn_boost: f32,
    pub speed_jitter: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            bh_mass: DEFAULT_BH_MASS,
            softening: DEFAULT_SOFTENING,
            halo_v0: DEFAULT_HALO_V0,
            halo_core_radius: DEFAULT_HALO_CORE,
            dt: DEFAULT_DT,
            model: DiskModel::Accretion,
            viscosity_base: DEFAULT_VISCOSITY_BASE,
            viscosity_core: DEFAULT_VISCOSITY_CORE,
            viscosity_ceiling: MAX_VISCOSITY,
            heat_scale: DEFAULT_HEAT_SCALE,
            brightness_cool: DEFAULT_BRIGHTNESS_COOL,
            brightness_min: BRIGHTNESS_MIN,
            brightness_max: BRIGHTNESS_MAX,
            horizon_radius: DEFAULT_HORIZON_RADIUS,
            respawn_r_min: DEFAULT_RESPAWN_R_MIN,
            respawn_r_max: DEFAULT_RESPAWN_R_MAX,
            fresh_brightness: FRESH_BRIGHTNESS,
            init_r_min: INIT_R_MIN,
            init_r_max: INIT_R_MAX,
            launch_boost: LAUNCH_BOOST,
            respawn_boost: RESPAWN_BOOST,
            speed_jitter: SPEED_JITTER,
        }
    }
}

impl SimulationParameters {
    pub fn gravity(&self) -> GravityField {
        GravityField::new(
            BlackHole::new(self.g, self.bh_mass, self.softening),
            Halo::new(self.halo_v0, self.halo_core_radius),
        )
    }

    pub fn accretion(&self) -> AccretionModel {
        AccretionModel {
            viscosity_base: self.viscosity_base,
            viscosity_core: self.viscosity_core,
            viscosity_ceiling: self.viscosity_ceiling,
            heat_scale: self.heat_scale,
            cooling: self.brightness_cool,
            brightness_min: self.brightness_min,
            brightness_max: self.brightness_max,
        }
    }

    /// Reject configurations the integrator cannot honour.
    ///
    /// Stepping never fails; bad values are caught once, when the
    /// configuration is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            self.g,
            self.bh_mass,
            self.softening,
            self.halo_v0,
            self.halo_core_radius,
            self.dt,
            self.viscosity_base,
            self.viscosity_core,
            self.viscosity_ceiling,
            self.heat_scale,
            self.brightness_cool,
            self.brightness_min,
            self.brightness_max,
            self.horizon_radius,
            self.respawn_r_min,
            self.respawn_r_max,
            self.fresh_brightness,
            self.init_r_min,
            self.init_r_max,
            self.launch_boost,
            self.respawn_boost,
            self.speed_jitter,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid(
                "simulation parameters must be finite".into(),
            ));
        }
        if self.dt <= 0.0 {
            return Err(ConfigError::Invalid(format!("dt must be positive, got {}", self.dt)));
        }
        if self.softening < 0.0 || self.halo_core_radius <= 0.0 || self.viscosity_core <= 0.0 {
            return Err(ConfigError::Invalid(
                "softening must be >= 0, halo core and viscosity core > 0".into(),
            ));
        }
        if self.g * self.bh_mass < 0.0 {
            return Err(ConfigError::Invalid("G*M must be non-negative".into()));
        }
        if !(0.0..1.0).contains(&self.viscosity_ceiling) {
            return Err(ConfigError::Invalid(format!(
                "viscosity ceiling must be in [0, 1), got {}",
                self.viscosity_ceiling
            )));
        }
        if self.brightness_min > self.brightness_max {
            return Err(ConfigError::Invalid(format!(
                "brightness range inverted: [{}, {}]",
                self.brightness_min, self.brightness_max
            )));
        }
        if self.respawn_r_min > self.respawn_r_max || self.respawn_r_min < self.horizon_radius {
            return Err(ConfigError::Invalid(format!(
                "respawn range [{}, {}] must be ordered and outside the horizon ({})",
                self.respawn_r_min, self.respawn_r_max, self.horizon_radius
            )));
        }
        if self.init_r_min < 0.0 || self.init_r_min > self.init_r_max {
            return Err(ConfigError::Invalid(format!(
                "initial radius range [{}, {}] is invalid",
                self.init_r_min, self.init_r_max
            )));
        }
        if !(0.0..1.0).contains(&self.speed_jitter) {
            return Err(ConfigError::Invalid(format!(
                "speed jitter must be in [0, 1), got {}",
                self.speed_jitter
            )));
        }
        Ok(())
    }
}
