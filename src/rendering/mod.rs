//! Rendering module
//!
//! CPU-side image generation for both pipelines (ray-marched disk and
//! lensed particle trails) plus the wgpu presenter that puts the finished
//! frame on screen.

pub mod camera;
pub mod disk;
pub mod frame;
pub mod lensing;
pub mod ray_marcher;
pub mod renderer;
pub mod shaders;
pub mod trails;

// Re-export commonly used items
pub use camera::Camera;
pub use disk::{DiskFrame, DiskParams};
pub use frame::Frame;
pub use lensing::{LensingParameters, LensingRenderer};
pub use ray_marcher::{march_ray, MarchOutcome, RayMarchSettings, RayMarcher};
pub use renderer::Renderer;
pub use shaders::ShaderManager;
pub use trails::{star_color, TrailCompositor, TrailSettings};

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("Device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("Surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("No compatible graphics adapter found")]
    NoAdapter,
    #[error("Shader error: {0}")]
    Shader(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
