//! Application configuration, stored as RON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::physics::constants::DEFAULT_PARTICLE_COUNT;
use crate::rendering::lensing::LensingParameters;
use crate::rendering::ray_marcher::RayMarchSettings;
use crate::rendering::trails::TrailSettings;
use crate::simulation::params::SimulationParameters;

pub const CONFIG_ENV_VAR: &str = "ACCRETION_LENS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "accretion-lens.ron";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("RON serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Which image ends up on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineMode {
    /// Particle disk, accumulated into trails and lensed in screen space.
    #[default]
    Galaxy,
    /// Ray-marched thin disk with bent light paths.
    RayMarch,
}

impl PipelineMode {
    pub fn toggled(self) -> Self {
        match self {
            PipelineMode::Galaxy => PipelineMode::RayMarch,
            PipelineMode::RayMarch => PipelineMode::Galaxy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Accretion Lens".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub mode: PipelineMode,
    pub seed: u64,
    pub particle_count: usize,
    pub simulation: SimulationParameters,
    pub trails: TrailSettings,
    pub lensing: LensingParameters,
    pub ray_march: RayMarchSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            mode: PipelineMode::default(),
            seed: 42,
            particle_count: DEFAULT_PARTICLE_COUNT,
            simulation: SimulationParameters::default(),
            trails: TrailSettings::default(),
            lensing: LensingParameters::default(),
            ray_march: RayMarchSettings::default(),
        }
    }
}

impl AppConfig {
    /// `$ACCRETION_LENS_CONFIG`, falling back to `accretion-lens.ron` in the
    /// working directory.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = ron::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load from `path`, or defaults when the file is missing or unusable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Failed to load config {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        self.simulation.validate()?;
        self.lensing.validate()?;
        self.ray_march.validate()?;
        if !(self.trails.world_scale > 0.0 && self.trails.world_scale.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "trail world scale must be positive, got {}",
                self.trails.world_scale
            )));
        }
        Ok(())
    }
}
