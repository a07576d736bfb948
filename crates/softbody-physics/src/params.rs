//! Physical parameters shared by every particle pair

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{SimError, SimResult};

/// Simulation-wide spring-damper constants.
///
/// These are injected into the force model on every evaluation; changing them
/// between steps takes effect from the next step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Spring constant `k`
    pub k: f32,
    /// Particle mass `m`
    pub mass: f32,
    /// Rest length `L`
    pub rest_length: f32,
    /// Gravity `g` (applied as `-g` on the y axis)
    pub gravity: f32,
    /// Damping coefficient `c`
    pub damping: f32,
}

impl PhysicsParams {
    pub fn new(k: f32, mass: f32, rest_length: f32, gravity: f32, damping: f32) -> Self {
        Self {
            k,
            mass,
            rest_length,
            gravity,
            damping,
        }
    }

    /// Reject parameter sets the force model cannot evaluate.
    pub fn validate(&self) -> SimResult<()> {
        let named = [
            ("k", self.k),
            ("mass", self.mass),
            ("rest_length", self.rest_length),
            ("gravity", self.gravity),
            ("damping", self.damping),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(SimError::NonFiniteParameter { name });
            }
        }
        if self.mass <= 0.0 {
            return Err(SimError::InvalidMass);
        }
        Ok(())
    }

    /// `k / m`, the spring term per unit stretch
    pub fn stiffness_per_mass(&self) -> f32 {
        self.k / self.mass
    }

    /// `c / m`, the damping term per unit velocity
    pub fn damping_per_mass(&self) -> f32 {
        self.damping / self.mass
    }
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            k: SPRING_K,
            mass: PARTICLE_MASS,
            rest_length: REST_LENGTH,
            gravity: GRAVITY,
            damping: DAMPING,
        }
    }
}
