use serde::{Deserialize, Serialize};

use crate::{core::VectorN, Float};

/// The coarse state of a [`Swarm`](crate::Swarm).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwarmState {
    /// No particles.
    #[default]
    Empty,
    /// Particles were placed but no step was taken since.
    Ready,
    /// At least one step was taken since the particles were placed.
    Iterating,
}

/// A read-only snapshot of a [`Swarm`](crate::Swarm), suitable for display or serialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SwarmStatus {
    /// Steps taken since the particles were placed.
    pub iteration_count: usize,
    /// The global best value, if the swarm has particles.
    pub best_value: Option<Float>,
    /// The position where [`SwarmStatus::best_value`] was found.
    pub best_position: Option<VectorN>,
    /// Mean of the current values of all particles.
    pub average_value: Float,
    /// The current velocity limit.
    pub max_velocity: Float,
    /// Number of particles.
    pub n_particles: usize,
    /// Consecutive stagnant abort checks.
    pub stagnant_iterations: usize,
    /// See [`SwarmState`].
    pub state: SwarmState,
}
