//! Error types for configuration and placement

use std::fmt;

/// Errors reported by the soft body core.
///
/// Every variant is a configuration problem detected before it can affect a
/// running simulation. Numeric edge cases inside a step (coincident particles,
/// divergence) never produce an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Particle mass must be positive and finite.
    InvalidMass,
    /// Time step must be positive and finite.
    InvalidTimeStep,
    /// A parameter was NaN or infinite.
    NonFiniteParameter { name: &'static str },
    /// A parameter was finite but outside its allowed range.
    InvalidParameter { name: &'static str },
    /// Placement area must have positive, finite width and height.
    InvalidArea,
    /// Minimum separation must be positive and finite.
    InvalidSeparation,
    /// A soft body needs at least one particle.
    InvalidParticleCount,
    /// Rejection sampling gave up on a particle.
    PlacementExhausted { index: usize, attempts: usize },
    /// Particle index is out of bounds.
    ParticleOutOfBounds { index: usize, count: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidMass => write!(f, "mass must be positive and finite"),
            SimError::InvalidTimeStep => write!(f, "time step must be positive and finite"),
            SimError::NonFiniteParameter { name } => {
                write!(f, "parameter `{}` must be finite", name)
            }
            SimError::InvalidParameter { name } => {
                write!(f, "parameter `{}` is out of range", name)
            }
            SimError::InvalidArea => write!(f, "placement area must be positive and finite"),
            SimError::InvalidSeparation => {
                write!(f, "minimum separation must be positive and finite")
            }
            SimError::InvalidParticleCount => write!(f, "particle count must be at least 1"),
            SimError::PlacementExhausted { index, attempts } => write!(
                f,
                "could not place particle {} within {} attempts (minimum separation too small for the area?)",
                index, attempts
            ),
            SimError::ParticleOutOfBounds { index, count } => {
                write!(f, "particle index {} out of bounds (count: {})", index, count)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias used throughout the workspace
pub type SimResult<T> = Result<T, SimError>;
