//! Classical fourth-order Runge-Kutta over the whole particle state
//!
//! All four stages are evaluated against the complete state vector. Locked
//! particles keep their current state in every stage, so their neighbours
//! feel them at the frozen position, and nothing is written back to them.

use softbody_physics::{Derivative, ForceModel, Particle, ParticleSet, ParticleState};

use crate::params::StepPolicy;

/// RK4 stepper with scratch buffers reused across steps
#[derive(Debug, Default)]
pub struct Rk4Integrator {
    policy: StepPolicy,
    state: Vec<ParticleState>,
    stage: Vec<ParticleState>,
    k1: Vec<Derivative>,
    k2: Vec<Derivative>,
    k3: Vec<Derivative>,
    k4: Vec<Derivative>,
}

impl Rk4Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: StepPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn set_policy(&mut self, policy: StepPolicy) {
        self.policy = policy;
    }

    fn reserve(&mut self, n: usize) {
        self.stage.resize(n, ParticleState::default());
        for k in [&mut self.k1, &mut self.k2, &mut self.k3, &mut self.k4] {
            k.resize(n, Derivative::default());
        }
    }

    /// Advance every unlocked particle by `dt`.
    ///
    /// No stability check is made; too large a `dt` or `k` diverges.
    pub fn step(&mut self, particles: &mut ParticleSet, model: &ForceModel, dt: f32) {
        let n = particles.len();
        if n == 0 {
            return;
        }
        self.reserve(n);
        particles.write_states(&mut self.state);

        let half_dt = 0.5 * dt;
        let bodies = particles.as_slice();

        model.evaluate_into(&self.state, &mut self.k1);

        fill_stage(bodies, &self.state, &self.k1, half_dt, &mut self.stage);
        model.evaluate_into(&self.stage, &mut self.k2);

        fill_stage(bodies, &self.state, &self.k2, half_dt, &mut self.stage);
        model.evaluate_into(&self.stage, &mut self.k3);

        fill_stage(bodies, &self.state, &self.k3, dt, &mut self.stage);
        model.evaluate_into(&self.stage, &mut self.k4);

        let sixth_dt = dt / 6.0;
        for (i, p) in particles.iter_mut().enumerate() {
            if p.locked {
                continue;
            }
            let (k1, k2, k3, k4) = (&self.k1[i], &self.k2[i], &self.k3[i], &self.k4[i]);
            let weighted = Derivative {
                velocity: k1.velocity + 2.0 * k2.velocity + 2.0 * k3.velocity + k4.velocity,
                acceleration: k1.acceleration
                    + 2.0 * k2.acceleration
                    + 2.0 * k3.acceleration
                    + k4.acceleration,
            };
            let next = self.state[i].advanced(&weighted, sixth_dt);
            p.position = next.position;
            p.velocity = self.policy.apply(next.velocity);
        }
    }
}

/// `out = base + k * h`, except locked particles stay at `base`
fn fill_stage(
    bodies: &[Particle],
    base: &[ParticleState],
    k: &[Derivative],
    h: f32,
    out: &mut [ParticleState],
) {
    for (i, s) in out.iter_mut().enumerate() {
        *s = if bodies[i].locked {
            base[i]
        } else {
            base[i].advanced(&k[i], h)
        };
    }
}
