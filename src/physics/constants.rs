//! Global constants for the simulation.
//!
//! Everything here is in simulation units (the disk) or pixels (the lensing
//! pass). Tunable values live in the parameter structs; these are the fixed
//! numerical guards and the defaults those structs start from.

use std::f32::consts::PI;

// ---------------------------------------------------------------------------
// Numerical guards
// ---------------------------------------------------------------------------
pub const RADIUS_EPSILON: f32 = 1e-3; // added to |r| before dividing by it
pub const MIN_SPAWN_DISTANCE: f32 = 0.1; // floor on |r| when building a tangent
pub const TAU: f32 = 2.0 * PI;

// ---------------------------------------------------------------------------
// Gravity (black hole + dark matter halo)
// ---------------------------------------------------------------------------
pub const DEFAULT_G: f32 = 2.0;
pub const DEFAULT_BH_MASS: f32 = 400.0;
pub const DEFAULT_SOFTENING: f32 = 0.5;
pub const DEFAULT_HALO_V0: f32 = 2.2; // flat rotation curve speed
pub const DEFAULT_HALO_CORE: f32 = 1.2;
pub const DEFAULT_DT: f32 = 0.01;

// ---------------------------------------------------------------------------
// Accretion disk
// ---------------------------------------------------------------------------
pub const DEFAULT_VISCOSITY_BASE: f32 = 0.003;
pub const DEFAULT_VISCOSITY_CORE: f32 = 1.0;
pub const MAX_VISCOSITY: f32 = 0.02;
pub const DEFAULT_HEAT_SCALE: f32 = 0.0012;
pub const DEFAULT_BRIGHTNESS_COOL: f32 = 0.997;
pub const BRIGHTNESS_MIN: f32 = 0.2;
pub const BRIGHTNESS_MAX: f32 = 2.0;
pub const FRESH_BRIGHTNESS: f32 = 0.6;
pub const DEFAULT_HORIZON_RADIUS: f32 = 7.0;
pub const DEFAULT_RESPAWN_R_MIN: f32 = 18.0;
pub const DEFAULT_RESPAWN_R_MAX: f32 = 28.0;

// ---------------------------------------------------------------------------
// Initial population
// ---------------------------------------------------------------------------
pub const INIT_R_MIN: f32 = 2.0;
pub const INIT_R_MAX: f32 = 30.0;
pub const LAUNCH_BOOST: f32 = 1.6; // super-circular factor seeding spiral arms
pub const RESPAWN_BOOST: f32 = 1.4;
pub const SPEED_JITTER: f32 = 0.05;
pub const DEFAULT_PARTICLE_COUNT: usize = 10_000;

// ---------------------------------------------------------------------------
// Ray marching
// ---------------------------------------------------------------------------
pub const MAX_MARCH_STEPS: u32 = 140;
pub const MAX_TRAVEL_DISTANCE: f32 = 80.0;
pub const DEFAULT_MARCH_STEP: f32 = 0.10;
pub const DEFAULT_BENDING_STRENGTH: f32 = 0.8;
/// Cosine of ~8 degrees; seed axes closer than this to the disk normal are
/// swapped for the fallback axis.
pub const SEED_AXIS_MAX_COS: f32 = 0.99;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------
pub const STAR_SPEED_REFERENCE: f32 = 6.0; // |v| mapped to full blue shift
pub const DEFAULT_WORLD_SCALE: f32 = 12.0; // pixels per simulation unit
pub const PHOTON_SPHERE_FACTOR: f32 = 1.5; // photon ring radius / horizon radius
