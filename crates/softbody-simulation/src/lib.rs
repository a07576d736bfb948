//! # Soft Body Simulation Engine
//!
//! RK4 integration, pointer interaction and the frame-level facade that the
//! windowing layer drives.

pub mod integrator;
pub mod interaction;
pub mod params;
pub mod simulation;

pub use integrator::*;
pub use interaction::*;
pub use params::*;
pub use simulation::*;

pub use softbody_physics::{
    ForceModel, Particle, ParticleSet, PhysicsParams, Placement, SimError, SimResult,
};
