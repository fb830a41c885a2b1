/// Basic implementations of [`AbortSignal`](crate::traits::AbortSignal)
pub mod abort_signal;
/// Random sampling helpers and the warning switch.
pub mod utils;
/// [`Vector3`] type for fixed three-dimensional vectors.
pub mod vector;
/// [`VectorN`] type for vectors with a runtime dimension.
pub mod vector_n;

pub use abort_signal::{AtomicAbortSignal, CtrlCAbortSignal, NopAbortSignal};
pub use vector::Vector3;
pub use vector_n::{VectorN, DEFAULT_EPSILON};
