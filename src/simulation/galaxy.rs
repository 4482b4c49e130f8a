//! Disk particle simulator.
//!
//! Fixed-size population under black hole + halo gravity, integrated with
//! semi-implicit Euler. In the accretion model particles also heat up, lose
//! speed to viscosity and are recycled to the outer disk when they cross the
//! horizon.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::physics::constants::*;
use crate::physics::{AccretionModel, GravityField};
use crate::simulation::params::{DiskModel, SimulationParameters};
use crate::simulation::particles::{Particles, RadiusStats};

pub struct GalaxySim {
    params: SimulationParameters,
    gravity: GravityField,
    accretion: AccretionModel,
    particles: Particles,
    rng: StdRng,
    seed: u64,
    captured: Vec<bool>, // scratch, one flag per slot
    steps: u64,
    recycled: u64,
}

impl GalaxySim {
    /// Empty simulator; call [`GalaxySim::initialize`] to populate it.
    pub fn new(params: SimulationParameters, seed: u64) -> Self {
        Self {
            gravity: params.gravity(),
            accretion: params.accretion(),
            params,
            particles: Particles::default(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            captured: Vec::new(),
            steps: 0,
            recycled: 0,
        }
    }

    /// Populate `count` particles from the simulator's seed.
    ///
    /// Calling this twice with the same seed and count yields the same set.
    pub fn initialize(&mut self, count: usize) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.particles.resize(count);
        self.captured.clear();
        self.captured.resize(count, false);
        self.steps = 0;
        self.recycled = 0;

        let p = self.params;
        for i in 0..count {
            let u: f32 = self.rng.gen();
            // sqrt(u) compensates for annulus area growing with radius
            let r = p.init_r_min + (p.init_r_max - p.init_r_min) * u.sqrt();
            let (pos, vel) = self.orbit_state(r, p.launch_boost);
            let brightness = 0.5 + 0.5 * self.rng.gen::<f32>();
            self.particles
                .set(i, pos, vel, self.accretion.clamp_brightness(brightness));
        }
        log::debug!("Initialized {} particles (seed {})", count, self.seed);
    }

    /// Switch to a new seed and repopulate with the current count.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        let count = self.particles.len();
        self.initialize(count);
    }

    /// Advance every particle by one `dt`.
    pub fn step(&mut self) {
        let dt = self.params.dt;
        let horizon = self.params.horizon_radius;
        let model = self.params.model;
        let gravity = self.gravity;
        let accretion = self.accretion;

        self.captured.resize(self.particles.len(), false);
        let Particles {
            pos_x,
            pos_y,
            vel_x,
            vel_y,
            brightness,
        } = &mut self.particles;

        // Slots are independent, so the integration phase runs in parallel.
        pos_x
            .par_iter_mut()
            .zip(pos_y.par_iter_mut())
            .zip(vel_x.par_iter_mut())
            .zip(vel_y.par_iter_mut())
            .zip(brightness.par_iter_mut())
            .zip(self.captured.par_iter_mut())
            .for_each(|(((((x, y), vx), vy), b), captured)| {
                let pos = Vec2::new(*x, *y);
                let dist = pos.length() + RADIUS_EPSILON;
                let inward = -pos / dist;

                // velocity first, then position from the new velocity
                let mut vel = Vec2::new(*vx, *vy) + inward * gravity.acceleration(dist) * dt;
                let pos = pos + vel * dt;

                let mut bright = *b;
                match model {
                    DiskModel::Accretion => accretion.apply(dist, &mut vel, &mut bright),
                    DiskModel::Orbital => bright = accretion.clamp_brightness(bright),
                }

                *x = pos.x;
                *y = pos.y;
                *vx = vel.x;
                *vy = vel.y;
                *b = bright;
                *captured = dist < horizon;
            });

        // Recycling draws from the RNG, so it stays sequential and in index
        // order to keep runs reproducible.
        let captured = std::mem::take(&mut self.captured);
        for (i, _) in captured.iter().enumerate().filter(|(_, hit)| **hit) {
            self.respawn_at_outer_ring(i);
        }
        self.captured = captured;
        self.steps += 1;
    }

    /// Reset slot `i` onto a boosted orbit in the respawn band.
    pub fn respawn_at_outer_ring(&mut self, i: usize) {
        let p = self.params;
        let u: f32 = self.rng.gen();
        let r = p.respawn_r_min + (p.respawn_r_max - p.respawn_r_min) * u;
        let (pos, vel) = self.orbit_state(r, p.respawn_boost);
        self.particles
            .set(i, pos, vel, self.accretion.clamp_brightness(p.fresh_brightness));
        self.recycled += 1;
    }

    /// Position at radius `r` (random angle) with a jittered tangential
    /// velocity of `boost` times the circular speed.
    fn orbit_state(&mut self, r: f32, boost: f32) -> (Vec2, Vec2) {
        let theta = self.rng.gen::<f32>() * TAU;
        let pos = Vec2::new(r * theta.cos(), r * theta.sin());

        let dist = pos.length().max(MIN_SPAWN_DISTANCE);
        let radial = pos / dist;
        let tangent = radial.perp();

        let jitter = (self.rng.gen::<f32>() * 2.0 - 1.0) * self.params.speed_jitter;
        let speed = self.gravity.circular_speed(dist) * boost * (1.0 + jitter);
        (pos, tangent * speed)
    }

    #[inline]
    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    #[inline]
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total horizon crossings since the last initialize.
    #[inline]
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    pub fn radius_stats(&self) -> RadiusStats {
        self.particles.radius_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(count: usize, seed: u64) -> GalaxySim {
        let mut s = GalaxySim::new(SimulationParameters::default(), seed);
        s.initialize(count);
        s
    }

    #[test]
    fn test_initial_radii_within_range() {
        let s = sim(2_000, 1);
        for r in s.particles().radii() {
            assert!(r >= INIT_R_MIN - 1e-3 && r <= INIT_R_MAX + 1e-3, "r = {}", r);
        }
    }

    #[test]
    fn test_initial_radii_biased_outward() {
        // sqrt sampling puts the median radius at 2 + 28 * sqrt(0.5) ~= 21.8
        let s = sim(4_000, 2);
        let mut radii: Vec<f32> = s.particles().radii().collect();
        radii.sort_by(|a, b| a.total_cmp(b));
        let median = radii[radii.len() / 2];
        assert!(median > 19.0 && median < 24.0, "median = {}", median);
    }

    #[test]
    fn test_initial_velocity_is_tangential_and_boosted() {
        let s = sim(500, 3);
        let field = SimulationParameters::default().gravity();
        let p = s.particles();
        for i in 0..p.len() {
            let pos = p.position(i);
            let vel = p.velocity(i);
            let r = pos.length();
            assert!(pos.dot(vel).abs() / (r * vel.length()) < 1e-3);
            let ratio = vel.length() / field.circular_speed(r.max(MIN_SPAWN_DISTANCE));
            assert!(ratio >= LAUNCH_BOOST * 0.95 - 1e-3 && ratio <= LAUNCH_BOOST * 1.05 + 1e-3);
        }
    }

    #[test]
    fn test_rotation_is_counter_clockwise() {
        let s = sim(100, 4);
        let p = s.particles();
        for i in 0..p.len() {
            assert!(p.position(i).perp_dot(p.velocity(i)) > 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        assert_eq!(sim(300, 42).particles(), sim(300, 42).particles());
        assert_ne!(sim(300, 42).particles(), sim(300, 43).particles());
    }

    #[test]
    fn test_initialize_twice_is_reproducible() {
        let mut s = sim(300, 9);
        let first = s.particles().clone();
        for _ in 0..10 {
            s.step();
        }
        s.initialize(300);
        assert_eq!(s.particles(), &first);
        assert_eq!(s.steps(), 0);
    }

    #[test]
    fn test_brightness_stays_in_range() {
        let mut s = sim(1_000, 5);
        for _ in 0..200 {
            s.step();
            for &b in &s.particles().brightness {
                assert!((BRIGHTNESS_MIN..=BRIGHTNESS_MAX).contains(&b), "b = {}", b);
            }
        }
    }

    #[test]
    fn test_captured_particles_respawn_in_band() {
        let mut s = sim(1_000, 6);
        let inside: Vec<usize> = (0..1_000)
            .filter(|&i| s.particles().radius(i) + RADIUS_EPSILON < DEFAULT_HORIZON_RADIUS)
            .collect();
        assert!(!inside.is_empty());
        s.step();
        for i in inside {
            let r = s.particles().radius(i);
            assert!(
                r >= DEFAULT_RESPAWN_R_MIN - 1e-3 && r <= DEFAULT_RESPAWN_R_MAX + 1e-3,
                "slot {} landed at r = {}",
                i,
                r
            );
            assert_eq!(s.particles().brightness[i], FRESH_BRIGHTNESS);
        }
        assert!(s.recycled() > 0);
    }

    #[test]
    fn test_population_size_is_fixed() {
        let mut s = sim(777, 7);
        for _ in 0..50 {
            s.step();
        }
        assert_eq!(s.particles().len(), 777);
        assert_eq!(s.steps(), 50);
    }

    #[test]
    fn test_orbital_model_conserves_speed_roughly() {
        // No viscosity: a circular orbit at r = 20 keeps its radius.
        let params = SimulationParameters {
            model: DiskModel::Orbital,
            launch_boost: 1.0,
            speed_jitter: 0.0,
            init_r_min: 20.0,
            init_r_max: 20.0,
            ..Default::default()
        };
        let mut s = GalaxySim::new(params, 11);
        s.initialize(16);
        for _ in 0..500 {
            s.step();
        }
        for r in s.particles().radii() {
            assert!((r - 20.0).abs() < 1.0, "r drifted to {}", r);
        }
    }

    #[test]
    fn test_empty_population_steps() {
        let mut s = sim(0, 8);
        s.step();
        assert!(s.particles().is_empty());
        assert_eq!(s.radius_stats().mean, 0.0);
    }
}
