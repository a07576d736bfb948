//! Pointer interaction: pin-and-drag a single particle or pan the whole body
//!
//! A gesture starts from `Idle`. If a particle lies within the capture radius
//! of the pointer it is locked and follows the pointer (`Dragging`); otherwise
//! the whole body follows the pointer (`Panning`). Ending the gesture returns
//! to `Idle` and unlocks whatever was grabbed.
//!
//! Pointer coordinates are shifted by `pointer_offset` on both axes before they
//! are compared with, or written to, particle positions.

use glam::Vec2;
use rand::Rng;
use softbody_physics::{uniform_point, ParticleSet};

const MAX_VELOCITY_BOUND: f32 = f32::MAX / 2.0;

/// Current gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// A single particle is pinned to the pointer
    Dragging(usize),
    /// Every particle translates with the pointer
    Panning,
}

/// Gesture state machine
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    mode: InteractionMode,
    /// Last pointer position, in particle space
    last_pointer: Option<Vec2>,
    capture_radius: f32,
    pointer_offset: f32,
}

impl InteractionController {
    pub fn new(capture_radius: f32, pointer_offset: f32) -> Self {
        Self {
            mode: InteractionMode::Idle,
            last_pointer: None,
            capture_radius,
            pointer_offset,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn last_pointer(&self) -> Option<Vec2> {
        self.last_pointer
    }

    pub fn is_idle(&self) -> bool {
        self.mode == InteractionMode::Idle
    }

    /// Pointer position mapped into particle space
    pub fn to_particle_space(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x - self.pointer_offset, y - self.pointer_offset)
    }

    /// `Idle -> Dragging(i)` when a particle is within reach of the pointer.
    ///
    /// Returns `false` and stays put when nothing is in reach or a gesture is
    /// already running.
    pub fn begin_gesture(&mut self, particles: &mut ParticleSet, x: f32, y: f32) -> bool {
        if !self.is_idle() {
            return false;
        }
        let target = self.to_particle_space(x, y);
        let Some(index) = particles.nearest_within(target, self.capture_radius) else {
            return false;
        };

        if particles.lock(index).is_err() || particles.set_position(index, target).is_err() {
            return false;
        }

        self.mode = InteractionMode::Dragging(index);
        self.last_pointer = Some(target);
        log::debug!("grabbed particle {} at ({:.1}, {:.1})", index, target.x, target.y);
        true
    }

    /// Move the pinned particle to the pointer. Its velocity is not written.
    pub fn update_gesture(&mut self, particles: &mut ParticleSet, x: f32, y: f32) {
        let InteractionMode::Dragging(index) = self.mode else {
            return;
        };
        let target = self.to_particle_space(x, y);
        if let Err(e) = particles.set_position(index, target) {
            log::warn!("dragged particle vanished: {}", e);
        }
        self.last_pointer = Some(target);
    }

    /// `Idle -> Panning`, remembering where the pan started
    pub fn begin_pan(&mut self, x: f32, y: f32) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.mode = InteractionMode::Panning;
        self.last_pointer = Some(self.to_particle_space(x, y));
        log::debug!("pan started at ({:.1}, {:.1})", x, y);
        true
    }

    /// Shift every particle by the pointer delta since the previous update.
    ///
    /// Runs between integrator steps, so lock flags are left as they are.
    pub fn update_pan(&mut self, particles: &mut ParticleSet, x: f32, y: f32) {
        if self.mode != InteractionMode::Panning {
            return;
        }
        let pointer = self.to_particle_space(x, y);
        if let Some(previous) = self.last_pointer {
            particles.translate(pointer - previous);
        }
        self.last_pointer = Some(pointer);
    }

    /// Any gesture `-> Idle`. Unlocks a dragged particle.
    pub fn end_gesture(&mut self, particles: &mut ParticleSet) {
        match self.mode {
            InteractionMode::Dragging(index) => {
                if let Err(e) = particles.unlock(index) {
                    log::warn!("could not release dragged particle: {}", e);
                }
                log::debug!("released particle {}", index);
            }
            InteractionMode::Panning => log::debug!("pan ended"),
            InteractionMode::Idle => {}
        }
        self.mode = InteractionMode::Idle;
        self.last_pointer = None;
    }

    /// Pointer pressed: grab a particle if one is in reach, otherwise start panning
    pub fn on_pointer_down(&mut self, particles: &mut ParticleSet, x: f32, y: f32) {
        if !self.begin_gesture(particles, x, y) {
            self.begin_pan(x, y);
        }
    }

    /// Pointer moved while pressed
    pub fn on_pointer_drag(&mut self, particles: &mut ParticleSet, x: f32, y: f32) {
        match self.mode {
            InteractionMode::Dragging(_) => self.update_gesture(particles, x, y),
            InteractionMode::Panning => self.update_pan(particles, x, y),
            InteractionMode::Idle => {}
        }
    }

    /// Pointer released
    pub fn on_pointer_up(&mut self, particles: &mut ParticleSet) {
        self.end_gesture(particles);
    }
}

/// Give every particle a fresh random velocity in `[-bound, bound]` per axis.
/// Positions are untouched; legal in any interaction state.
pub fn apply_impulse<R: Rng + ?Sized>(particles: &mut ParticleSet, rng: &mut R, bound: f32) {
    for p in particles.iter_mut() {
        p.velocity = random_velocity(rng, bound);
    }
}

/// Relocate every particle uniformly in `[min, max)` with a bounded random velocity
pub fn scatter<R: Rng + ?Sized>(
    particles: &mut ParticleSet,
    rng: &mut R,
    min: Vec2,
    max: Vec2,
    bound: f32,
) {
    for p in particles.iter_mut() {
        p.position = uniform_point(rng, min, max);
        p.velocity = random_velocity(rng, bound);
    }
}

/// `bound` is folded into `[0, f32::MAX / 2]` so the sampled range is always finite
fn random_velocity<R: Rng + ?Sized>(rng: &mut R, bound: f32) -> Vec2 {
    let bound = bound.abs().min(MAX_VELOCITY_BOUND);
    Vec2::new(
        rng.random_range(-bound..=bound),
        rng.random_range(-bound..=bound),
    )
}
