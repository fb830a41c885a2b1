use serde::{Deserialize, Serialize};

use crate::Float;

/// Two best values closer than this are considered equal by the abort criterion.
pub const STAGNATION_TOLERANCE: Float = 1e-10;

/// Counts consecutive checks in which the global best value did not change.
///
/// The tracker starts with a previous best of $`-\infty`$, so the first check after a reset
/// only records the current best.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StagnationTracker {
    previous_best_value: Float,
    stagnant_iterations: usize,
}

impl Default for StagnationTracker {
    fn default() -> Self {
        Self {
            previous_best_value: Float::NEG_INFINITY,
            stagnant_iterations: 0,
        }
    }
}

impl StagnationTracker {
    /// Record the current global best value and report whether the swarm has converged.
    ///
    /// If `best` is within [`STAGNATION_TOLERANCE`] of the previous value, the stagnant counter
    /// is compared against `abort_after`: once it exceeds it the tracker resets and `true` is
    /// returned, otherwise the counter is incremented. Any other value becomes the new reference and
    /// clears the counter. Without a best value nothing is recorded.
    pub fn check(&mut self, best: Option<Float>, abort_after: usize) -> bool {
        match best {
            Some(value) if (value - self.previous_best_value).abs() < STAGNATION_TOLERANCE => {
                if self.stagnant_iterations > abort_after {
                    self.reset();
                    true
                } else {
                    self.stagnant_iterations += 1;
                    false
                }
            }
            Some(value) => {
                self.previous_best_value = value;
                self.stagnant_iterations = 0;
                false
            }
            None => false,
        }
    }
    /// Forget the previous best and clear the counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
    /// The number of consecutive stagnant checks so far.
    pub const fn stagnant_iterations(&self) -> usize {
        self.stagnant_iterations
    }
    /// The best value recorded by the latest non-stagnant check.
    pub const fn previous_best_value(&self) -> Float {
        self.previous_best_value
    }
}
