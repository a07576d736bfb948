use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use softbody_physics::{place, PhysicsParams};
use softbody_simulation::{
    InteractionMode, ParticleSet, SimulationConfig, SoftBodySimulation, StepPolicy,
};

/// Build a simulation over explicit positions with gravity and damping off
pub fn springs_only(positions: &[Vec2], k: f32, mass: f32, rest_length: f32) -> SoftBodySimulation {
    let config = SimulationConfig {
        seed: Some(99),
        physics: PhysicsParams::new(k, mass, rest_length, 0.0, 0.0),
        ..Default::default()
    };
    SoftBodySimulation::from_particles(config, ParticleSet::from_positions(positions.iter().copied()))
        .unwrap()
}

pub fn seeded(particle_count: usize, seed: u64) -> SoftBodySimulation {
    SoftBodySimulation::new(SimulationConfig {
        particle_count,
        seed: Some(seed),
        ..Default::default()
    })
    .unwrap()
}

fn momentum(sim: &SoftBodySimulation) -> Vec2 {
    sim.particles().iter().map(|p| p.velocity).sum::<Vec2>() * sim.physics().mass
}

// ==================================================================================
// Two-particle scenarios
// ==================================================================================

#[test]
fn compressed_pair_pushes_apart() {
    // k=6, m=0.5, L=100, g=0, c=0, dt=0.05; separation 10 is below the rest length.
    // The restoring law (|r| - L) unit(r) makes a compressed pair repel.
    let mut sim = springs_only(&[Vec2::ZERO, Vec2::new(10.0, 0.0)], 6.0, 0.5, 100.0);
    sim.tick(0.05).unwrap();

    let p0 = sim.particles()[0];
    let p1 = sim.particles()[1];
    assert!(p0.velocity.x < 0.0, "particle 0 vx = {}", p0.velocity.x);
    assert!(p1.velocity.x > 0.0, "particle 1 vx = {}", p1.velocity.x);
    assert!((p0.velocity.x + p1.velocity.x).abs() < 1e-3);
    assert!(p0.velocity.y.abs() < 1e-6 && p1.velocity.y.abs() < 1e-6);
    // Initial acceleration is (k/m)(10 - 100) = -1080, so |v| is of order 54
    assert!(p0.velocity.x < -40.0 && p0.velocity.x > -60.0);
}

#[test]
fn stretched_pair_accelerates_toward_each_other() {
    let mut sim = springs_only(&[Vec2::ZERO, Vec2::new(110.0, 0.0)], 6.0, 0.5, 100.0);
    sim.tick(0.05).unwrap();

    assert!(sim.particles()[0].velocity.x > 0.0);
    assert!(sim.particles()[1].velocity.x < 0.0);
}

#[test]
fn pair_at_rest_length_stays_put() {
    let start = [Vec2::new(10.0, 10.0), Vec2::new(10.0, 110.0)];
    let mut sim = springs_only(&start, 6.0, 0.5, 100.0);
    for _ in 0..120 {
        sim.tick(1.0 / 60.0).unwrap();
    }
    for (p, s) in sim.particles().iter().zip(start.iter()) {
        assert!((p.position - *s).length() < 1e-3, "{:?} drifted from {:?}", p.position, s);
        assert!(p.velocity.length() < 1e-3);
    }
}

#[test]
fn free_body_conserves_momentum() {
    let mut sim = seeded(12, 5);
    sim.configure(4.0, 0.5, 60.0, 0.0, 0.0).unwrap();
    sim.on_impulse_requested();
    let before = momentum(&sim);
    for _ in 0..60 {
        sim.tick(1.0 / 120.0).unwrap();
    }
    let after = momentum(&sim);
    let scale: f32 = sim.particles().iter().map(|p| p.velocity.length()).sum::<f32>()
        * sim.physics().mass;
    let tolerance = 1e-4 * scale + 1e-3;
    assert!(
        (after - before).length() < tolerance,
        "{:?} -> {:?} (tolerance {})",
        before,
        after,
        tolerance
    );
}

// ==================================================================================
// Placement scenarios
// ==================================================================================

#[test]
fn twenty_particles_in_small_area() {
    let mut rng = StdRng::seed_from_u64(2024);
    let set = place(&mut rng, 20, 100.0, 100.0, 10.0).unwrap();
    assert_eq!(set.len(), 20);
    for i in 1..set.len() {
        let nearest = (0..i)
            .map(|j| set[i].position.distance(set[j].position))
            .fold(f32::INFINITY, f32::min);
        assert!(nearest <= 10.0 + 1e-4, "particle {} is isolated ({})", i, nearest);
    }
}

#[test]
fn placement_failure_is_reported_as_configuration_error() {
    let config = SimulationConfig {
        particle_count: 10,
        area_width: 1.0e6,
        area_height: 1.0e6,
        min_separation: 1.0e-3,
        max_placement_attempts: 50,
        seed: Some(1),
        ..Default::default()
    };
    assert!(SoftBodySimulation::new(config).is_err());
}

// ==================================================================================
// Interaction scenarios
// ==================================================================================

#[test]
fn drag_gesture_pins_then_releases() {
    let mut sim = seeded(10, 77);
    let offset = sim.config().pointer_offset;
    let grab = sim.particles()[3].position;

    sim.on_pointer_down(grab.x + offset, grab.y + offset);
    assert_eq!(sim.interaction_mode(), InteractionMode::Dragging(3));
    assert!(sim.particles()[3].locked);

    let path = [(40.0, 40.0), (55.0, 42.0), (70.0, 60.0)];
    for (x, y) in path {
        sim.on_pointer_drag(x, y);
        sim.step().unwrap();
        // Integration never moves the pinned particle
        assert_eq!(sim.particles()[3].position, Vec2::new(x - offset, y - offset));
    }

    sim.on_pointer_up();
    assert_eq!(sim.interaction_mode(), InteractionMode::Idle);
    assert!(!sim.particles()[3].locked);
    assert_eq!(sim.particles()[3].position, Vec2::new(70.0 - offset, 60.0 - offset));
}

#[test]
fn dragging_one_particle_pulls_its_neighbours() {
    let mut sim = springs_only(&[Vec2::ZERO, Vec2::new(10.0, 0.0)], 1.0, 1.0, 10.0);
    let offset = sim.config().pointer_offset;
    sim.on_pointer_down(10.0 + offset, offset);
    sim.on_pointer_drag(100.0 + offset, offset);
    sim.tick(0.05).unwrap();

    assert_eq!(sim.particles()[1].position, Vec2::new(100.0, 0.0));
    assert!(sim.particles()[0].velocity.x > 0.0);
}

#[test]
fn pan_translates_whole_body() {
    let mut sim = seeded(10, 8);
    let before: Vec<Vec2> = sim.particles().iter().map(|p| p.position).collect();

    // Far outside the blob so nothing is captured
    sim.on_pointer_down(-5000.0, -5000.0);
    assert_eq!(sim.interaction_mode(), InteractionMode::Panning);
    sim.on_pointer_drag(-4990.0, -5000.0);
    sim.on_pointer_drag(-4990.0, -4980.0);
    sim.on_pointer_up();

    for (p, b) in sim.particles().iter().zip(before.iter()) {
        assert!((p.position - (*b + Vec2::new(10.0, 20.0))).length() < 1e-3);
    }
    assert_eq!(sim.particles().locked_count(), 0);
}

#[test]
fn impulse_respects_bound_and_keeps_positions() {
    let mut sim = seeded(25, 3);
    let bound = sim.config().impulse_bound;
    let before: Vec<Vec2> = sim.particles().iter().map(|p| p.position).collect();

    sim.on_impulse_requested();
    for (p, b) in sim.particles().iter().zip(before.iter()) {
        assert_eq!(p.position, *b);
        assert!(p.velocity.x >= -bound && p.velocity.x <= bound);
        assert!(p.velocity.y >= -bound && p.velocity.y <= bound);
    }
}

#[test]
fn scatter_spreads_over_enlarged_area() {
    let mut sim = seeded(40, 4);
    let (min, max) = sim.config().scatter_bounds();
    let bound = sim.config().impulse_bound;
    sim.on_scatter_requested();
    for p in sim.particles() {
        assert!(p.position.x >= min.x && p.position.x <= max.x);
        assert!(p.position.y >= min.y && p.position.y <= max.y);
        assert!(p.velocity.x.abs() <= bound && p.velocity.y.abs() <= bound);
    }
}

#[test]
fn quantum_policy_lets_damped_body_settle() {
    let mut sim = seeded(6, 21);
    sim.configure(0.0, 1.0, 50.0, 0.0, 5.0).unwrap();
    sim.set_policy(StepPolicy {
        max_speed: Some(500.0),
        quantum: Some(0.5),
    })
    .unwrap();
    sim.on_impulse_requested();
    for _ in 0..600 {
        sim.step().unwrap();
    }
    assert!(sim.particles().iter().all(|p| p.velocity == Vec2::ZERO));
}
