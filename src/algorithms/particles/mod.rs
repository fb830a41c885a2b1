/// [`SwarmConfig`] and the enums it is built from.
pub mod config;
pub use config::{ComputationMode, Direction, SwarmConfig};

/// [`Particle`] type, a single member of a swarm.
pub mod particle;
pub use particle::Particle;

/// [`StagnationTracker`] used by the abort criterion.
pub mod stagnation;
pub use stagnation::{StagnationTracker, STAGNATION_TOLERANCE};

/// [`Swarm`] type which owns the particles and advances them.
pub mod swarm;
pub use swarm::Swarm;

/// [`SwarmStatus`] snapshot type.
pub mod swarm_status;
pub use swarm_status::{SwarmState, SwarmStatus};
