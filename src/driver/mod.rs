/// [`SwarmRunner`], the one-step-per-tick driver.
pub mod runner;
pub use runner::{SwarmRunner, TickOutcome};

/// [`TrackingObserver`] which records particle histories.
pub mod tracking;
pub use tracking::TrackingObserver;

/// [`Variation`], the parameter-sweep driver.
pub mod variation;
pub use variation::{Variation, VariationSample, VariationVariable};
