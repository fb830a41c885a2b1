/// Module containing the particle swarm engine.
pub mod particles;
pub use particles::{Particle, Swarm, SwarmConfig, SwarmStatus};
