use serde::{Deserialize, Serialize};

use crate::{
    error::{SwarmError, SwarmResult},
    Float,
};

/// Whether the swarm searches for a maximum or a minimum of its objective.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Larger values are better.
    #[default]
    Maximize,
    /// Smaller values are better.
    Minimize,
}

impl Direction {
    /// Select [`Direction::Minimize`] if `minimize` is `true`, [`Direction::Maximize`] otherwise.
    pub const fn from_minimize(minimize: bool) -> Self {
        if minimize {
            Self::Minimize
        } else {
            Self::Maximize
        }
    }
    /// Returns `true` if `a` is strictly better than `b`. Comparisons involving `NaN` are never
    /// better.
    pub fn is_better(self, a: Float, b: Float) -> bool {
        match self {
            Self::Maximize => a > b,
            Self::Minimize => a < b,
        }
    }
}

/// The update rule used for the particle velocities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputationMode {
    /// Particles are attracted by their personal best and the global best.
    #[default]
    GlobalBest,
    /// Particles are additionally attracted by the best particle within the neighbour radius.
    GlobalAndLocalBest,
}

impl TryFrom<usize> for ComputationMode {
    type Error = SwarmError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::GlobalBest),
            1 => Ok(Self::GlobalAndLocalBest),
            _ => Err(SwarmError::InvalidConfiguration(format!(
                "unsupported computation mode index {value}"
            ))),
        }
    }
}

/// The tunable parameters of a [`Swarm`](crate::Swarm).
///
/// Parameters are read at the start of every step, so edits take effect on the next call to
/// [`Swarm::compute_next_step`](crate::Swarm::compute_next_step).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Cognitive weight (pull toward the personal best).
    pub c1: Float,
    /// Social weight (pull toward the global best).
    pub c2: Float,
    /// Local weight (pull toward the best neighbour, only used in
    /// [`ComputationMode::GlobalAndLocalBest`]).
    pub c3: Float,
    /// Inertial weight.
    pub w: Float,
    /// Euclidean distance below which two particles are neighbours.
    pub neighbour_radius: Float,
    /// Current limit on the length of a velocity.
    pub max_velocity: Float,
    /// Floor for [`SwarmConfig::max_velocity`] when `auto_velocity` is enabled.
    pub min_velocity: Float,
    /// Shrink `max_velocity` toward `min_velocity` while the swarm stagnates.
    pub auto_velocity: bool,
    /// The velocity update rule.
    pub computation_mode: ComputationMode,
    /// Search for a maximum or a minimum.
    pub direction: Direction,
    /// Whether drivers stop once the abort criterion is met.
    pub abort_enabled: bool,
    /// Number of stagnant checks tolerated before the abort criterion is met.
    pub abort_after: usize,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            c1: 2.0,
            c2: 2.0,
            c3: 2.0,
            w: 1.0,
            neighbour_radius: 10.0,
            max_velocity: 10.0,
            min_velocity: 0.5,
            auto_velocity: false,
            computation_mode: ComputationMode::GlobalBest,
            direction: Direction::Maximize,
            abort_enabled: true,
            abort_after: 1,
        }
    }
}

impl SwarmConfig {
    /// Sets the cognitive weight $`c_1`$ (default = `2.0`).
    pub fn with_c1(&mut self, value: Float) -> &mut Self {
        self.c1 = value;
        self
    }
    /// Sets the social weight $`c_2`$ (default = `2.0`).
    pub fn with_c2(&mut self, value: Float) -> &mut Self {
        self.c2 = value;
        self
    }
    /// Sets the local weight $`c_3`$ (default = `2.0`).
    pub fn with_c3(&mut self, value: Float) -> &mut Self {
        self.c3 = value;
        self
    }
    /// Sets the inertial weight $`w`$ (default = `1.0`).
    pub fn with_w(&mut self, value: Float) -> &mut Self {
        self.w = value;
        self
    }
    /// Sets the neighbour radius (default = `10.0`).
    pub fn with_neighbour_radius(&mut self, value: Float) -> &mut Self {
        self.neighbour_radius = value;
        self
    }
    /// Sets the velocity limit (default = `10.0`).
    pub fn with_max_velocity(&mut self, value: Float) -> &mut Self {
        self.max_velocity = value;
        self
    }
    /// Sets the floor of the velocity limit used by auto-velocity (default = `0.5`).
    pub fn with_min_velocity(&mut self, value: Float) -> &mut Self {
        self.min_velocity = value;
        self
    }
    /// Enables or disables auto-velocity (default = `false`).
    pub fn with_auto_velocity(&mut self, value: bool) -> &mut Self {
        self.auto_velocity = value;
        self
    }
    /// Sets the [`ComputationMode`] (default = [`ComputationMode::GlobalBest`]).
    pub fn with_computation_mode(&mut self, value: ComputationMode) -> &mut Self {
        self.computation_mode = value;
        self
    }
    /// Sets the search [`Direction`] (default = [`Direction::Maximize`]).
    pub fn with_direction(&mut self, value: Direction) -> &mut Self {
        self.direction = value;
        self
    }
    /// Enables or disables the abort criterion for drivers (default = `true`).
    pub fn with_abort_enabled(&mut self, value: bool) -> &mut Self {
        self.abort_enabled = value;
        self
    }
    /// Sets the number of tolerated stagnant checks (default = `1`).
    pub fn with_abort_after(&mut self, value: usize) -> &mut Self {
        self.abort_after = value;
        self
    }
    /// Check that the parameters can be used for a step.
    ///
    /// A neighbour radius of zero is accepted: no particle then has a neighbour and
    /// [`ComputationMode::GlobalAndLocalBest`] behaves like [`ComputationMode::GlobalBest`].
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfiguration`] if a coefficient is not finite, the neighbour
    /// radius or a velocity limit is negative or not finite, or auto-velocity is enabled with
    /// `max_velocity < min_velocity`.
    pub fn validate(&self) -> SwarmResult<()> {
        for (name, value) in [("c1", self.c1), ("c2", self.c2), ("c3", self.c3), ("w", self.w)] {
            if !value.is_finite() {
                return Err(SwarmError::InvalidConfiguration(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("neighbour radius", self.neighbour_radius),
            ("max velocity", self.max_velocity),
            ("min velocity", self.min_velocity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SwarmError::InvalidConfiguration(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.auto_velocity && self.max_velocity < self.min_velocity {
            return Err(SwarmError::InvalidConfiguration(format!(
                "max velocity {} is below min velocity {}",
                self.max_velocity, self.min_velocity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction() {
        assert!(Direction::Maximize.is_better(2.0, 1.0));
        assert!(!Direction::Maximize.is_better(1.0, 1.0));
        assert!(Direction::Minimize.is_better(1.0, 2.0));
        assert!(!Direction::Minimize.is_better(Float::NAN, 2.0));
        assert_eq!(Direction::from_minimize(true), Direction::Minimize);
        assert_eq!(Direction::from_minimize(false), Direction::Maximize);
        assert_eq!(Direction::default(), Direction::Maximize);
    }

    #[test]
    fn test_mode_from_index() {
        assert_eq!(
            ComputationMode::try_from(0).unwrap(),
            ComputationMode::GlobalBest
        );
        assert_eq!(
            ComputationMode::try_from(1).unwrap(),
            ComputationMode::GlobalAndLocalBest
        );
        assert!(matches!(
            ComputationMode::try_from(2),
            Err(SwarmError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = SwarmConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.abort_after, 1);
        assert_eq!(config.direction, Direction::Maximize);
    }

    #[test]
    fn test_validate() {
        let mut config = SwarmConfig::default();
        config.with_neighbour_radius(0.0);
        assert!(config.validate().is_ok());
        config.with_neighbour_radius(-1.0);
        assert!(config.validate().is_err());
        config.with_neighbour_radius(1.0).with_c1(Float::NAN);
        assert!(config.validate().is_err());
        config.with_c1(1.0).with_max_velocity(-0.5);
        assert!(config.validate().is_err());
        config
            .with_max_velocity(0.1)
            .with_min_velocity(0.5)
            .with_auto_velocity(false);
        assert!(config.validate().is_ok());
        config.with_auto_velocity(true);
        assert!(matches!(
            config.validate(),
            Err(SwarmError::InvalidConfiguration(_))
        ));
    }
}
