use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    algorithms::particles::SwarmStatus,
    core::{utils::maybe_warn, NopAbortSignal},
    error::SwarmResult,
    traits::{AbortSignal, SwarmObserver},
    Swarm,
};

/// The result of one [`SwarmRunner::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The swarm has no particles, nothing was done.
    Idle,
    /// The abort criterion was met, no step was taken.
    Converged,
    /// The abort signal was raised, no step was taken.
    Aborted,
    /// A step was taken and an observer asked to stop.
    Stopped,
    /// A step was taken; the snapshot describes the swarm after it.
    Stepped(SwarmStatus),
}

impl TickOutcome {
    /// Returns `true` if the driver should keep ticking.
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Stepped(_))
    }
}

/// A driver which advances a [`Swarm`] one step per [`SwarmRunner::tick`], like a UI timer.
///
/// Each tick first asks the swarm whether it has converged (the check always runs, since it
/// feeds auto-velocity, but it only stops the runner if
/// [`SwarmConfig::abort_enabled`](crate::SwarmConfig::abort_enabled) is set), then checks the
/// abort signal, then steps and notifies every observer.
///
/// ```rust
/// use pso_engine::prelude::*;
/// use pso_engine::test_functions::Sphere;
///
/// let mut swarm = Swarm::new(2, Sphere { n: 2 }).with_seed(1);
/// swarm.set_direction(Direction::Minimize);
/// swarm
///     .create_swarm(16, &VectorN::from(vec![-3.0, -3.0]), &VectorN::from(vec![3.0, 3.0]), false)
///     .unwrap();
/// let mut runner = SwarmRunner::new(swarm);
/// assert!(runner.tick().unwrap().is_running());
/// assert_eq!(runner.swarm().iteration_count(), 1);
/// ```
pub struct SwarmRunner {
    swarm: Swarm,
    observers: Vec<Arc<RwLock<dyn SwarmObserver>>>,
    abort_signal: Box<dyn AbortSignal>,
}

impl SwarmRunner {
    /// Wrap a [`Swarm`] without observers and with a [`NopAbortSignal`].
    pub fn new(swarm: Swarm) -> Self {
        Self {
            swarm,
            observers: Vec::default(),
            abort_signal: Box::new(NopAbortSignal),
        }
    }
    /// Convenience method to use chainable methods to set up the [`SwarmRunner`].
    pub fn setup<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&mut Self) -> &mut Self,
    {
        f(&mut self);
        self
    }
    /// Set the [`AbortSignal`] of the [`SwarmRunner`].
    pub fn with_abort_signal<A: AbortSignal + 'static>(&mut self, abort_signal: A) -> &mut Self {
        self.abort_signal = Box::new(abort_signal);
        self
    }
    /// Adds a single [`SwarmObserver`] to the [`SwarmRunner`].
    pub fn add_observer(&mut self, observer: Arc<RwLock<dyn SwarmObserver>>) -> &mut Self {
        self.observers.push(observer);
        self
    }
    /// The driven swarm.
    pub const fn swarm(&self) -> &Swarm {
        &self.swarm
    }
    /// The driven swarm, e.g. to change parameters between ticks.
    pub fn swarm_mut(&mut self) -> &mut Swarm {
        &mut self.swarm
    }
    /// Give back the swarm.
    pub fn into_inner(self) -> Swarm {
        self.swarm
    }
    /// Perform one timer tick.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Swarm::compute_next_step`]; the swarm is left as it was and no
    /// observer is called.
    pub fn tick(&mut self) -> SwarmResult<TickOutcome> {
        if self.swarm.is_empty() {
            return Ok(TickOutcome::Idle);
        }
        if self.swarm.check_abort_criterion() && self.swarm.config().abort_enabled {
            return Ok(TickOutcome::Converged);
        }
        if self.abort_signal.is_aborted() {
            return Ok(TickOutcome::Aborted);
        }
        self.swarm.compute_next_step()?;
        let step = self.swarm.iteration_count();
        let mut stop = false;
        for observer in &self.observers {
            stop |= observer.write().callback(step, &self.swarm).is_break();
        }
        if stop {
            Ok(TickOutcome::Stopped)
        } else {
            Ok(TickOutcome::Stepped(self.swarm.status()))
        }
    }
    /// Tick until the outcome is not [`TickOutcome::Stepped`] or `max_ticks` ticks were
    /// performed, and return the last outcome ([`TickOutcome::Idle`] if `max_ticks` is zero).
    /// The abort signal is reset first.
    ///
    /// # Errors
    ///
    /// Returns the first error of [`SwarmRunner::tick`].
    pub fn run(&mut self, max_ticks: usize) -> SwarmResult<TickOutcome> {
        self.abort_signal.reset();
        let mut outcome = TickOutcome::Idle;
        for _ in 0..max_ticks {
            outcome = self.tick()?;
            if !outcome.is_running() {
                break;
            }
        }
        if outcome == TickOutcome::Aborted {
            maybe_warn(&format!(
                "Swarm stopped by abort signal after {} iterations",
                self.swarm.iteration_count()
            ));
        }
        Ok(outcome)
    }
}
