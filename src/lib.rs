//! `pso-engine` is a particle swarm simulation engine: a population of particles moves through a
//! search space, each one pulled toward its own best position, the best position found by the
//! whole swarm and (optionally) the best particle in its neighbourhood. The engine is driven one
//! step at a time by an external scheduler (a UI timer, a batch loop) which reads the swarm state
//! back after every step.
//!
//! # Table of Contents
//! - [Key Features](#key-features)
//! - [Quick Start](#quick-start)
//! - [Update Rules](#update-rules)
//! - [Drivers](#drivers)
//!
//! # Key Features
//! * A deterministic stepping protocol with an explicit state machine (empty, ready, iterating,
//!   converged).
//! * Global-best and global+local-best update rules with Euclidean neighbourhoods.
//! * Stagnation detection and adaptive shrinking of the velocity limit.
//! * Any [`Objective`](traits::Objective) can be optimized, maximized (the default) or minimized.
//! * Pressing `Ctrl-C` during a parameter sweep stops it cleanly if a
//!   [`CtrlCAbortSignal`](core::CtrlCAbortSignal) is installed.
//!
//! # Quick Start
//!
//! ```rust
//! use pso_engine::prelude::*;
//! use pso_engine::test_functions::Sphere;
//!
//! fn main() -> SwarmResult<()> {
//!     let mut swarm = Swarm::new(2, Sphere { n: 2 }).with_seed(0);
//!     swarm.configure(|c| c.with_direction(Direction::Minimize).with_w(0.7).with_c1(1.4).with_c2(1.4));
//!     swarm.create_swarm(25, &VectorN::from(vec![-5.0, -5.0]), &VectorN::from(vec![5.0, 5.0]), true)?;
//!     for _ in 0..50 {
//!         swarm.compute_next_step()?;
//!     }
//!     assert_eq!(swarm.iteration_count(), 50);
//!     assert!(swarm.best_value() < 1.0);
//!     Ok(())
//! }
//! ```
//!
//! # Update Rules
//!
//! In [`ComputationMode::GlobalBest`] every particle updates its velocity as
//! ```math
//! v \leftarrow w v + c_1 r_1 (p - x) + c_2 r_2 (g - x)
//! ```
//! where $`p`$ is the particle's personal best, $`g`$ the global best and $`r_i`$ fresh uniform
//! draws in $`[0, 1)`$. [`ComputationMode::GlobalAndLocalBest`] adds $`c_3 r_3 (n - x)`$ where
//! $`n`$ is the position of the neighbour (within the neighbour radius) with the best current
//! value. The velocity is then rescaled to the current velocity limit if it exceeds it, and the
//! particle moves by its velocity.
//!
//! # Drivers
//!
//! The [`driver`] module contains two schedulers built on top of [`Swarm`]: a
//! [`SwarmRunner`](driver::SwarmRunner) which mirrors an interactive timer (one tick, one step)
//! and a [`Variation`](driver::Variation) which sweeps a parameter and records how many
//! iterations the swarm needs to converge.
#![warn(
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::doc_link_with_quotes,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::perf,
    clippy::style,
    missing_docs
)]

/// Module containing particle-based algorithms.
pub mod algorithms;
/// Module containing the vector types, abort signals and utilities.
pub mod core;
/// Module containing the schedulers which drive a [`Swarm`].
pub mod driver;
/// Module containing the [`SwarmError`] type.
pub mod error;
/// Module containing standard functions for testing algorithms.
pub mod test_functions;
/// Module containing the traits at the seams of the engine.
pub mod traits;

pub use algorithms::particles::{ComputationMode, Direction, Particle, Swarm, SwarmConfig};
pub use error::{SwarmError, SwarmResult};

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(feature = "f32")]
pub type Float = f32;

/// The mathematical constant $`\pi`$.
#[cfg(not(feature = "f32"))]
pub const PI: Float = std::f64::consts::PI;

/// The mathematical constant $`\pi`$.
#[cfg(feature = "f32")]
pub const PI: Float = std::f32::consts::PI;

pub use nalgebra::DVector;

/// Prelude module containing everything someone should need to use this crate for non-development
/// purposes
pub mod prelude {
    pub use crate::{
        core::{Vector3, VectorN},
        driver::{SwarmRunner, TickOutcome, Variation, VariationVariable},
        traits::{AbortSignal, FnObjective, Objective, SwarmObserver},
        ComputationMode, Direction, Float, Particle, Swarm, SwarmConfig, SwarmError, SwarmResult,
    };
}
