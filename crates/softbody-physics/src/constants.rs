//! Default physical constants for the soft body
//!
//! Values are in screen units (pixels, seconds) and tuned so that a body of a
//! few dozen particles settles into a visible blob at 60 steps per second.

/// Spring constant `k` shared by every particle pair
pub const SPRING_K: f32 = 6.0;

/// Mass of a single particle
pub const PARTICLE_MASS: f32 = 0.5;

/// Rest length `L` at which a pair exerts no spring force
pub const REST_LENGTH: f32 = 100.0;

/// Gravity, subtracted from the y component of every acceleration
pub const GRAVITY: f32 = 0.0;

/// Velocity damping coefficient `c`
pub const DAMPING: f32 = 1.0;

/// Separations at or below this are treated as coincident particles.
/// The spring direction is undefined there, so the pair contributes nothing.
pub const SEPARATION_EPSILON: f32 = 1.0e-6;

/// Radius used when rendering a particle as a filled circle
pub const PARTICLE_RADIUS: f32 = 5.0;

/// Upper bound on rejection-sampling attempts for a single particle
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100_000;
