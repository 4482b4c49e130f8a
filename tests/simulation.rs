use accretion_lens::simulation::{DiskModel, GalaxySim, SimulationParameters};

const RESPAWN_BAND_TOLERANCE: f32 = 5.0;

fn scenario_params() -> SimulationParameters {
    SimulationParameters {
        g: 2.0,
        bh_mass: 400.0,
        softening: 0.5,
        dt: 0.01,
        launch_boost: 1.1,
        ..Default::default()
    }
}

#[test]
fn disk_settles_around_respawn_band() {
    let params = scenario_params();
    let mut sim = GalaxySim::new(params, 2024);
    sim.initialize(100);
    for _ in 0..1000 {
        sim.step();
    }

    let stats = sim.radius_stats();
    let lo = params.respawn_r_min - RESPAWN_BAND_TOLERANCE;
    let hi = params.respawn_r_max + RESPAWN_BAND_TOLERANCE;
    assert!(
        stats.mean >= lo && stats.mean <= hi,
        "mean radius {} outside [{}, {}]",
        stats.mean,
        lo,
        hi
    );
    assert_eq!(sim.particles().len(), 100);
    assert_eq!(sim.steps(), 1000);
    assert!(sim.recycled() > 0, "inner disk should feed the horizon");
}

#[test]
fn state_stays_finite_and_bounded() {
    let mut sim = GalaxySim::new(SimulationParameters::default(), 5);
    sim.initialize(500);
    for _ in 0..300 {
        sim.step();
    }
    let p = sim.particles();
    let params = sim.params();
    for i in 0..p.len() {
        assert!(p.position(i).is_finite());
        assert!(p.velocity(i).is_finite());
        assert!(p.brightness[i] >= params.brightness_min);
        assert!(p.brightness[i] <= params.brightness_max);
    }
}

#[test]
fn same_seed_same_trajectory() {
    let run = |seed: u64| {
        let mut sim = GalaxySim::new(scenario_params(), seed);
        sim.initialize(250);
        for _ in 0..200 {
            sim.step();
        }
        (sim.particles().clone(), sim.recycled())
    };
    assert_eq!(run(11), run(11));
    assert_ne!(run(11).0, run(12).0);
}

#[test]
fn reseed_matches_fresh_simulator() {
    let mut a = GalaxySim::new(scenario_params(), 1);
    a.initialize(64);
    for _ in 0..50 {
        a.step();
    }
    a.reseed(77);

    let mut b = GalaxySim::new(scenario_params(), 77);
    b.initialize(64);
    assert_eq!(a.particles(), b.particles());
    assert_eq!(a.steps(), 0);
}

#[test]
fn captured_particles_reappear_in_band() {
    let params = SimulationParameters {
        init_r_min: 2.0,
        init_r_max: 6.0,
        launch_boost: 0.2,
        ..scenario_params()
    };
    let mut sim = GalaxySim::new(params, 3);
    sim.initialize(200);
    let mut seen = 0;
    for _ in 0..50 {
        let before = sim.recycled();
        sim.step();
        seen += sim.recycled() - before;
    }
    assert!(seen > 0);
    // recycled slots land back in the respawn band
    let p = sim.particles();
    let outside = (0..p.len())
        .filter(|&i| p.radius(i) >= params.respawn_r_min * 0.9)
        .count();
    assert!(outside > 0);
}

#[test]
fn orbital_model_also_recycles() {
    let params = SimulationParameters {
        model: DiskModel::Orbital,
        init_r_min: 1.0,
        init_r_max: 3.0,
        launch_boost: 0.1,
        ..scenario_params()
    };
    let mut sim = GalaxySim::new(params, 9);
    sim.initialize(50);
    for _ in 0..20 {
        sim.step();
    }
    assert!(sim.recycled() >= 50);
}
