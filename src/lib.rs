//! Black hole accretion disk visualiser.
//!
//! Two pipelines share one window: a particle disk whose trails are lensed in
//! screen space, and a ray-marched thin disk seen through heuristically bent
//! light paths.

pub mod config;
pub mod physics;
pub mod rendering;
pub mod simulation;
