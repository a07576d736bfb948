//! Spring-damper force model
//!
//! Every pair of particles is coupled by an implicit spring with rest length
//! `L`. Stretched pairs attract, compressed pairs repel, so a single law gives
//! both cohesion and self-avoidance. Gravity and linear damping act per
//! particle.

use glam::Vec2;

use crate::constants::SEPARATION_EPSILON;
use crate::params::PhysicsParams;
use crate::particle::{Derivative, ParticleState};

/// Spring acceleration on the particle at `xi` due to the one at `xt`.
/// a = (k/m) * (|xt - xi| - L) * unit(xt - xi)
///
/// Coincident particles have no spring direction and contribute zero.
pub fn spring_acceleration(xi: Vec2, xt: Vec2, params: &PhysicsParams) -> Vec2 {
    let r = xt - xi;
    let length = r.length();
    if length <= SEPARATION_EPSILON {
        return Vec2::ZERO;
    }
    let magnitude = params.stiffness_per_mass() * (length - params.rest_length);
    r * (magnitude / length)
}

/// Gravity plus damping for a single particle moving at `velocity`
pub fn body_acceleration(velocity: Vec2, params: &PhysicsParams) -> Vec2 {
    Vec2::new(0.0, -params.gravity) - velocity * params.damping_per_mass()
}

/// Right-hand side of the coupled ODE system
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForceModel {
    params: PhysicsParams,
}

impl ForceModel {
    pub fn new(params: PhysicsParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn set_params(&mut self, params: PhysicsParams) {
        self.params = params;
    }

    /// Derivative of every particle for the candidate `state`
    pub fn evaluate(&self, state: &[ParticleState]) -> Vec<Derivative> {
        let mut out = vec![Derivative::default(); state.len()];
        self.evaluate_into(state, &mut out);
        out
    }

    /// Allocation-free form of [`ForceModel::evaluate`]; `out` must match `state` in length
    pub fn evaluate_into(&self, state: &[ParticleState], out: &mut [Derivative]) {
        debug_assert_eq!(state.len(), out.len());
        let n = state.len();

        for (s, d) in state.iter().zip(out.iter_mut()) {
            d.velocity = s.velocity;
            d.acceleration = body_acceleration(s.velocity, &self.params);
        }

        // Equal masses make the pair law antisymmetric, so each unordered pair is visited once
        for i in 0..n {
            let xi = state[i].position;
            for j in (i + 1)..n {
                let a = spring_acceleration(xi, state[j].position, &self.params);
                out[i].acceleration += a;
                out[j].acceleration -= a;
            }
        }
    }
}
