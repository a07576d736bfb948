//! Frame-level soft body simulation
//!
//! `SoftBodySimulation` owns the particle set exclusively. The driver calls
//! pointer handlers, then `tick`, then `render`, once per frame. Every method
//! takes `&mut self`, so interaction and integration can never overlap.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use softbody_physics::{ForceModel, ParticleSet, PhysicsParams, SimError, SimResult};

use crate::integrator::Rk4Integrator;
use crate::interaction::{apply_impulse, scatter, InteractionController, InteractionMode};
use crate::params::{SimulationConfig, StepPolicy};

/// One filled circle to draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderedParticle {
    pub position: Vec2,
    pub radius: f32,
}

/// Summary numbers for logging and diagnostics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationStats {
    pub particle_count: usize,
    pub locked_count: usize,
    pub centroid: Vec2,
    pub kinetic_energy: f32,
    pub max_speed: f32,
    pub elapsed: f64,
    pub steps: u64,
}

/// Soft body simulation manager
pub struct SoftBodySimulation {
    config: SimulationConfig,
    particles: ParticleSet,
    model: ForceModel,
    integrator: Rk4Integrator,
    interaction: InteractionController,
    rng: StdRng,
    elapsed: f64,
    steps: u64,
}

impl SoftBodySimulation {
    /// Validate `config` and place the initial particles
    pub fn new(config: SimulationConfig) -> SimResult<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let particles = config.placement().place(config.particle_count, &mut rng)?;
        log::info!(
            "Initialized soft body: {} particles in {}x{} (min separation {})",
            particles.len(),
            config.area_width,
            config.area_height,
            config.min_separation
        );
        Ok(Self::assemble(config, particles, rng))
    }

    /// Start from an explicit particle set instead of running placement.
    /// `config.particle_count` is overwritten with the set's length.
    pub fn from_particles(mut config: SimulationConfig, particles: ParticleSet) -> SimResult<Self> {
        if particles.is_empty() {
            return Err(SimError::InvalidParticleCount);
        }
        config.particle_count = particles.len();
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self::assemble(config, particles, rng))
    }

    fn assemble(config: SimulationConfig, particles: ParticleSet, rng: StdRng) -> Self {
        Self {
            model: ForceModel::new(config.physics),
            integrator: Rk4Integrator::with_policy(config.policy),
            interaction: InteractionController::new(config.capture_radius, config.pointer_offset),
            config,
            particles,
            rng,
            elapsed: 0.0,
            steps: 0,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn physics(&self) -> &PhysicsParams {
        self.model.params()
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    /// Advance the body by `dt`
    pub fn tick(&mut self, dt: f32) -> SimResult<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidTimeStep);
        }
        self.integrator.step(&mut self.particles, &self.model, dt);
        self.elapsed += dt as f64;
        self.steps += 1;
        Ok(())
    }

    /// Advance by the configured time step
    pub fn step(&mut self) -> SimResult<()> {
        self.tick(self.config.time_step)
    }

    /// Snapshot for drawing
    pub fn render(&self) -> Vec<RenderedParticle> {
        let radius = self.config.particle_radius;
        self.particles
            .iter()
            .map(|p| RenderedParticle {
                position: p.position,
                radius,
            })
            .collect()
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.interaction.on_pointer_down(&mut self.particles, x, y);
    }

    pub fn on_pointer_drag(&mut self, x: f32, y: f32) {
        self.interaction.on_pointer_drag(&mut self.particles, x, y);
    }

    pub fn on_pointer_up(&mut self) {
        self.interaction.on_pointer_up(&mut self.particles);
    }

    /// Random kick to every particle
    pub fn on_impulse_requested(&mut self) {
        apply_impulse(&mut self.particles, &mut self.rng, self.config.impulse_bound);
        log::debug!("impulse applied (bound {})", self.config.impulse_bound);
    }

    /// Spread the body over the enlarged area
    pub fn on_scatter_requested(&mut self) {
        let (min, max) = self.config.scatter_bounds();
        scatter(
            &mut self.particles,
            &mut self.rng,
            min,
            max,
            self.config.impulse_bound,
        );
        log::debug!(
            "scattered over ({:.0}, {:.0})..({:.0}, {:.0})",
            min.x,
            min.y,
            max.x,
            max.y
        );
    }

    /// Replace the physical constants. Invalid values are rejected and the
    /// previous constants stay in effect.
    pub fn configure(
        &mut self,
        k: f32,
        mass: f32,
        rest_length: f32,
        gravity: f32,
        damping: f32,
    ) -> SimResult<()> {
        self.set_physics(PhysicsParams::new(k, mass, rest_length, gravity, damping))
    }

    pub fn set_physics(&mut self, params: PhysicsParams) -> SimResult<()> {
        if let Err(e) = params.validate() {
            log::warn!("rejected physics parameters {:?}: {}", params, e);
            return Err(e);
        }
        self.model.set_params(params);
        self.config.physics = params;
        log::debug!("physics parameters updated: {:?}", params);
        Ok(())
    }

    pub fn set_policy(&mut self, policy: StepPolicy) -> SimResult<()> {
        if let Err(e) = policy.validate() {
            log::warn!("rejected step policy {:?}: {}", policy, e);
            return Err(e);
        }
        self.integrator.set_policy(policy);
        self.config.policy = policy;
        Ok(())
    }

    /// Re-run placement with a new particle count.
    ///
    /// Any running gesture is ended first. On failure the current body is kept.
    pub fn resize(&mut self, particle_count: usize) -> SimResult<()> {
        if particle_count == 0 {
            return Err(SimError::InvalidParticleCount);
        }
        let particles = self
            .config
            .placement()
            .place(particle_count, &mut self.rng)
            .inspect_err(|e| log::warn!("resize to {} failed: {}", particle_count, e))?;
        self.interaction.end_gesture(&mut self.particles);
        self.particles = particles;
        self.config.particle_count = particle_count;
        log::info!("Resized soft body to {} particles", particle_count);
        Ok(())
    }

    pub fn stats(&self) -> SimulationStats {
        let mass = self.model.params().mass;
        let (kinetic_energy, max_speed) =
            self.particles
                .iter()
                .fold((0.0_f32, 0.0_f32), |(energy, max_speed), p| {
                    let speed_sq = p.velocity.length_squared();
                    (energy + 0.5 * mass * speed_sq, max_speed.max(speed_sq.sqrt()))
                });
        SimulationStats {
            particle_count: self.particles.len(),
            locked_count: self.particles.locked_count(),
            centroid: self.particles.centroid(),
            kinetic_energy,
            max_speed,
            elapsed: self.elapsed,
            steps: self.steps,
        }
    }
}
