//! Physics module for the accretion disk and the ray marcher
//!
//! Pure math only: the gravity field felt by disk particles, the viscous
//! accretion model, and the heuristic light bending used when marching rays.

pub mod accretion;
pub mod bending;
pub mod black_hole;
pub mod constants;

// Re-export commonly used items
pub use accretion::AccretionModel;
pub use bending::{bend_direction, plane_crossing};
pub use black_hole::{BlackHole, GravityField, Halo};
pub use constants::*;
