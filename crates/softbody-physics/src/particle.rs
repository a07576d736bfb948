//! Particle state and the fixed-length particle set

use glam::Vec2;

use crate::error::{SimError, SimResult};

/// A point mass in the soft body
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in 2D space
    pub position: Vec2,
    /// Velocity vector
    pub velocity: Vec2,
    /// Locked particles are skipped by the integrator
    pub locked: bool,
}

impl Particle {
    /// Create an unlocked particle at rest
    pub fn at_rest(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            locked: false,
        }
    }

    pub fn state(&self) -> ParticleState {
        ParticleState {
            position: self.position,
            velocity: self.velocity,
        }
    }
}

/// The integrated part of a particle: one entry of the ODE state vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticleState {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl ParticleState {
    /// `self + derivative * h`
    pub fn advanced(&self, derivative: &Derivative, h: f32) -> Self {
        Self {
            position: self.position + derivative.velocity * h,
            velocity: self.velocity + derivative.acceleration * h,
        }
    }
}

/// Time derivative of a [`ParticleState`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Derivative {
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

/// Ordered, fixed-length collection of particles.
///
/// A particle's index is its identity for the lifetime of the set. There is no
/// way to add or remove particles; a new count means a new set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    /// Build a set of particles at rest at the given positions
    pub fn from_positions(positions: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            particles: positions.into_iter().map(Particle::at_rest).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.particles.iter_mut()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    fn checked_mut(&mut self, index: usize) -> SimResult<&mut Particle> {
        let count = self.particles.len();
        self.particles
            .get_mut(index)
            .ok_or(SimError::ParticleOutOfBounds { index, count })
    }

    /// Exempt a particle from integration
    pub fn lock(&mut self, index: usize) -> SimResult<()> {
        self.checked_mut(index)?.locked = true;
        Ok(())
    }

    /// Hand a particle back to the integrator
    pub fn unlock(&mut self, index: usize) -> SimResult<()> {
        self.checked_mut(index)?.locked = false;
        Ok(())
    }

    /// Move a particle directly, bypassing the integrator
    pub fn set_position(&mut self, index: usize, position: Vec2) -> SimResult<()> {
        self.checked_mut(index)?.position = position;
        Ok(())
    }

    pub fn locked_count(&self) -> usize {
        self.particles.iter().filter(|p| p.locked).count()
    }

    /// Shift every particle by `delta`, locked or not. Velocities are untouched.
    pub fn translate(&mut self, delta: Vec2) {
        for p in self.particles.iter_mut() {
            p.position += delta;
        }
    }

    /// Index of the particle closest to `point`, if it lies within `radius`
    pub fn nearest_within(&self, point: Vec2, radius: f32) -> Option<usize> {
        let radius_sq = radius * radius;
        self.particles
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.position.distance_squared(point)))
            .filter(|&(_, d2)| d2 <= radius_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Mean position of all particles
    pub fn centroid(&self) -> Vec2 {
        if self.particles.is_empty() {
            return Vec2::ZERO;
        }
        let sum: Vec2 = self.particles.iter().map(|p| p.position).sum();
        sum / self.particles.len() as f32
    }

    /// Copy the integrated state of every particle into `out`
    pub fn write_states(&self, out: &mut Vec<ParticleState>) {
        out.clear();
        out.extend(self.particles.iter().map(Particle::state));
    }
}

impl std::ops::Index<usize> for ParticleSet {
    type Output = Particle;

    fn index(&self, index: usize) -> &Particle {
        &self.particles[index]
    }
}

impl std::ops::IndexMut<usize> for ParticleSet {
    fn index_mut(&mut self, index: usize) -> &mut Particle {
        &mut self.particles[index]
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}
