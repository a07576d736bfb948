//! Runtime configuration for the simulation

use glam::Vec2;
use serde::{Deserialize, Serialize};
use softbody_physics::{
    PhysicsParams, Placement, SimError, SimResult, MAX_PLACEMENT_ATTEMPTS, PARTICLE_RADIUS,
};

/// Optional post-step velocity policy.
///
/// `max_speed` clamps the speed of every integrated particle; `quantum` snaps
/// speeds below it to exactly zero so a damped body comes to a visible stop
/// instead of drifting forever. Both are off by default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepPolicy {
    pub max_speed: Option<f32>,
    pub quantum: Option<f32>,
}

impl StepPolicy {
    pub fn validate(&self) -> SimResult<()> {
        if let Some(max_speed) = self.max_speed {
            check_non_negative("max_speed", max_speed)?;
        }
        if let Some(quantum) = self.quantum {
            check_non_negative("quantum", quantum)?;
        }
        Ok(())
    }

    /// Apply the snap, then the clamp
    pub fn apply(&self, velocity: Vec2) -> Vec2 {
        let speed = velocity.length();
        if let Some(quantum) = self.quantum {
            if speed < quantum {
                return Vec2::ZERO;
            }
        }
        match self.max_speed {
            Some(max_speed) if speed > max_speed => velocity * (max_speed / speed),
            _ => velocity,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.max_speed.is_none() && self.quantum.is_none()
    }
}

/// Everything needed to construct and run a [`crate::SoftBodySimulation`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub particle_count: usize,
    pub area_width: f32,
    pub area_height: f32,
    /// Every placed particle lies within this distance of an earlier one
    pub min_separation: f32,
    /// Pointer distance within which a particle can be grabbed
    pub capture_radius: f32,
    /// Subtracted from both pointer coordinates before they touch particle space
    pub pointer_offset: f32,
    /// Radius reported by `render()`
    pub particle_radius: f32,
    /// Impulse and scatter velocities are drawn from `[-bound, bound]` per axis
    pub impulse_bound: f32,
    /// Scatter spreads particles over the area scaled by this factor about its center
    pub scatter_scale: f32,
    pub max_placement_attempts: usize,
    /// Step used by the driver loop when it has no better clock
    pub time_step: f32,
    /// Seed for placement, impulse and scatter; `None` draws from the OS
    pub seed: Option<u64>,
    pub physics: PhysicsParams,
    pub policy: StepPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 30,
            area_width: 600.0,
            area_height: 400.0,
            min_separation: 20.0,
            capture_radius: 10.0,
            pointer_offset: PARTICLE_RADIUS,
            particle_radius: PARTICLE_RADIUS,
            impulse_bound: 200.0,
            scatter_scale: 2.0,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            time_step: 1.0 / 60.0,
            seed: None,
            physics: PhysicsParams::default(),
            policy: StepPolicy::default(),
        }
    }
}

impl SimulationConfig {
    pub fn placement(&self) -> Placement {
        Placement::new(self.area_width, self.area_height, self.min_separation)
            .with_max_attempts(self.max_placement_attempts)
    }

    /// Center of the placement area
    pub fn area_center(&self) -> Vec2 {
        Vec2::new(self.area_width, self.area_height) * 0.5
    }

    /// Corners of the enlarged area used by scatter
    pub fn scatter_bounds(&self) -> (Vec2, Vec2) {
        let half = Vec2::new(self.area_width, self.area_height) * 0.5 * self.scatter_scale;
        let center = self.area_center();
        (center - half, center + half)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.particle_count == 0 {
            return Err(SimError::InvalidParticleCount);
        }
        self.placement().validate()?;
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SimError::InvalidTimeStep);
        }
        check_non_negative("capture_radius", self.capture_radius)?;
        check_non_negative("particle_radius", self.particle_radius)?;
        check_non_negative("impulse_bound", self.impulse_bound)?;
        // Velocities are drawn from [-bound, bound], whose width must stay finite
        if !(2.0 * self.impulse_bound).is_finite() {
            return Err(SimError::InvalidParameter {
                name: "impulse_bound",
            });
        }
        if !self.pointer_offset.is_finite() {
            return Err(SimError::NonFiniteParameter {
                name: "pointer_offset",
            });
        }
        if !self.scatter_scale.is_finite() {
            return Err(SimError::NonFiniteParameter {
                name: "scatter_scale",
            });
        }
        let (min, max) = self.scatter_bounds();
        if self.scatter_scale < 1.0 || !(max - min).is_finite() || !min.is_finite() {
            return Err(SimError::InvalidParameter {
                name: "scatter_scale",
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(SimError::InvalidParameter {
                name: "max_placement_attempts",
            });
        }
        self.physics.validate()?;
        self.policy.validate()
    }
}

fn check_non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if !value.is_finite() {
        return Err(SimError::NonFiniteParameter { name });
    }
    if value < 0.0 {
        return Err(SimError::InvalidParameter { name });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_time_step() {
        let mut config = SimulationConfig::default();
        config.time_step = 0.0;
        assert_eq!(config.validate(), Err(SimError::InvalidTimeStep));
        config.time_step = f32::INFINITY;
        assert_eq!(config.validate(), Err(SimError::InvalidTimeStep));
    }

    #[test]
    fn test_rejects_bad_mass_and_area() {
        let mut config = SimulationConfig::default();
        config.physics.mass = -0.5;
        assert_eq!(config.validate(), Err(SimError::InvalidMass));

        let mut config = SimulationConfig::default();
        config.area_height = 0.0;
        assert_eq!(config.validate(), Err(SimError::InvalidArea));
    }

    #[test]
    fn test_rejects_shrinking_scatter() {
        let mut config = SimulationConfig::default();
        config.scatter_scale = 0.5;
        assert_eq!(
            config.validate(),
            Err(SimError::InvalidParameter {
                name: "scatter_scale"
            })
        );
    }

    #[test]
    fn test_rejects_bound_with_infinite_span() {
        let mut config = SimulationConfig::default();
        config.impulse_bound = 3.0e38;
        assert_eq!(
            config.validate(),
            Err(SimError::InvalidParameter {
                name: "impulse_bound"
            })
        );
        config.impulse_bound = 1.0e30;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_scatter_area_overflow() {
        let mut config = SimulationConfig::default();
        config.scatter_scale = 1.0e38;
        assert_eq!(
            config.validate(),
            Err(SimError::InvalidParameter {
                name: "scatter_scale"
            })
        );
        config.scatter_scale = 1.0e6;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_scatter_bounds_are_centered() {
        let config = SimulationConfig {
            area_width: 100.0,
            area_height: 50.0,
            scatter_scale: 2.0,
            ..Default::default()
        };
        let (min, max) = config.scatter_bounds();
        assert_eq!(min, Vec2::new(-50.0, -25.0));
        assert_eq!(max, Vec2::new(150.0, 75.0));
    }

    #[test]
    fn test_policy_snaps_and_clamps() {
        let policy = StepPolicy {
            max_speed: Some(10.0),
            quantum: Some(0.5),
        };
        assert_eq!(policy.apply(Vec2::new(0.3, 0.0)), Vec2::ZERO);
        let clamped = policy.apply(Vec2::new(30.0, 40.0));
        assert!((clamped.length() - 10.0).abs() < 1e-4);
        assert_eq!(policy.apply(Vec2::new(3.0, 4.0)), Vec2::new(3.0, 4.0));
        assert!(StepPolicy::default().is_noop());
    }

    #[test]
    fn test_policy_rejects_negative_threshold() {
        let policy = StepPolicy {
            max_speed: Some(-1.0),
            quantum: None,
        };
        assert_eq!(
            policy.validate(),
            Err(SimError::InvalidParameter { name: "max_speed" })
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SimulationConfig = toml::from_str(
            r#"
            particle_count = 12
            seed = 5

            [physics]
            k = 3.0

            [policy]
            max_speed = 400.0
            "#,
        )
        .unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.physics.k, 3.0);
        assert_eq!(config.physics.mass, PhysicsParams::default().mass);
        assert_eq!(config.policy.max_speed, Some(400.0));
        assert_eq!(config.policy.quantum, None);
        assert_eq!(config.area_width, SimulationConfig::default().area_width);
    }
}
