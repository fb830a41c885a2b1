use std::{ops::ControlFlow, sync::Arc};

use parking_lot::RwLock;

use crate::Swarm;

/// A trait which holds a [`callback`](`SwarmObserver::callback`) function that is called by a
/// [`SwarmRunner`](crate::driver::SwarmRunner) after every step of the [`Swarm`].
pub trait SwarmObserver {
    /// A function that is called after each step. Returning [`ControlFlow::Break`] stops the
    /// runner.
    fn callback(&mut self, step: usize, swarm: &Swarm) -> ControlFlow<()>;
}

/// A debugging observer which prints out the step and the swarm status at every step.
///
/// # Usage:
///
/// ```rust
/// use pso_engine::prelude::*;
/// use pso_engine::test_functions::Sphere;
/// use pso_engine::traits::observer::DebugObserver;
///
/// let mut swarm = Swarm::new(2, Sphere { n: 2 }).with_seed(0);
/// swarm.add_particle_2d(1.0, 1.0).unwrap();
/// let mut runner = SwarmRunner::new(swarm).setup(|r| r.add_observer(DebugObserver::build()));
/// runner.tick().unwrap();
/// // ^ This will print the status after the step
/// ```
pub struct DebugObserver;
impl DebugObserver {
    /// Finalize the [`SwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self))
    }
}
impl SwarmObserver for DebugObserver {
    fn callback(&mut self, step: usize, swarm: &Swarm) -> ControlFlow<()> {
        println!("Step: {}\n{:#?}", step, swarm.status());
        ControlFlow::Continue(())
    }
}
