//! # Soft Body Physics
//!
//! Particle model, initial placement and the pairwise spring-damper force law
//! for a 2D soft body made of point masses.

pub mod constants;
pub mod error;
pub mod forces;
pub mod params;
pub mod particle;
pub mod placement;

pub use constants::*;
pub use error::*;
pub use forces::*;
pub use params::*;
pub use particle::*;
pub use placement::*;
