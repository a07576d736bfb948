//! Initial particle layout under a chained minimum-separation constraint
//!
//! Particle 0 lands anywhere in the area. Every later particle is rejection
//! sampled until it falls within `min_separation` of some particle that is
//! already placed, so the result is one connected blob rather than scattered
//! points.

use glam::Vec2;
use rand::Rng;

use crate::constants::MAX_PLACEMENT_ATTEMPTS;
use crate::error::{SimError, SimResult};
use crate::particle::ParticleSet;

/// Rectangular placement region anchored at the origin plus the separation rule
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub width: f32,
    pub height: f32,
    pub min_separation: f32,
    /// Candidates tried per particle before giving up
    pub max_attempts: usize,
}

impl Placement {
    pub fn new(width: f32, height: f32, min_separation: f32) -> Self {
        Self {
            width,
            height,
            min_separation,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(SimError::InvalidArea);
        }
        if !self.min_separation.is_finite() || self.min_separation <= 0.0 {
            return Err(SimError::InvalidSeparation);
        }
        Ok(())
    }

    /// Generate `n` particles at rest.
    ///
    /// Fails with [`SimError::PlacementExhausted`] instead of looping forever
    /// when the separation is too small for the area to hit by chance.
    pub fn place<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> SimResult<ParticleSet> {
        self.validate()?;
        if n == 0 {
            return Err(SimError::InvalidParticleCount);
        }

        let min_sep_sq = self.min_separation * self.min_separation;
        let mut positions: Vec<Vec2> = Vec::with_capacity(n);
        positions.push(uniform_point(rng, Vec2::ZERO, Vec2::new(self.width, self.height)));

        for index in 1..n {
            let mut accepted = None;
            for _ in 0..self.max_attempts {
                let candidate =
                    uniform_point(rng, Vec2::ZERO, Vec2::new(self.width, self.height));
                if positions
                    .iter()
                    .any(|placed| placed.distance_squared(candidate) <= min_sep_sq)
                {
                    accepted = Some(candidate);
                    break;
                }
            }

            match accepted {
                Some(p) => positions.push(p),
                None => {
                    log::warn!(
                        "placement gave up on particle {} after {} attempts",
                        index,
                        self.max_attempts
                    );
                    return Err(SimError::PlacementExhausted {
                        index,
                        attempts: self.max_attempts,
                    });
                }
            }
        }

        log::debug!(
            "placed {} particles in {}x{} (min separation {})",
            n,
            self.width,
            self.height,
            self.min_separation
        );
        Ok(ParticleSet::from_positions(positions))
    }
}

/// Place `n` particles with the default attempt bound
pub fn place<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    width: f32,
    height: f32,
    min_separation: f32,
) -> SimResult<ParticleSet> {
    Placement::new(width, height, min_separation).place(n, rng)
}

/// Uniform random point in the box `[min, max)`.
/// Degenerate axes (`min == max`) collapse to `min`.
pub fn uniform_point<R: Rng + ?Sized>(rng: &mut R, min: Vec2, max: Vec2) -> Vec2 {
    Vec2::new(
        min.x + rng.random::<f32>() * (max.x - min.x),
        min.y + rng.random::<f32>() * (max.y - min.y),
    )
}
