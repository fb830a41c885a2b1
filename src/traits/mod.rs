/// Module containing the [`AbortSignal`] trait.
pub mod abort_signal;
/// Module containing the [`Objective`] trait and its implementations.
pub mod objective;
/// Module containing the [`SwarmObserver`] trait.
pub mod observer;

pub use abort_signal::AbortSignal;
pub use objective::{EmptyObjective, FnObjective, Objective};
pub use observer::SwarmObserver;
