use thiserror::Error;

use crate::Float;

/// Result type alias for swarm operations.
pub type SwarmResult<T> = std::result::Result<T, SwarmError>;

/// The errors which can be returned by the swarm engine.
///
/// Every variant is a synchronous, recoverable error: the object which returned it is left in the
/// state it had before the failing call.
#[derive(Error, Debug)]
pub enum SwarmError {
    /// Two vectors (or a vector and the swarm) have different dimensions.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Indexed access outside of `[0, len)`.
    #[error("Index {index} out of range for vector of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the accessed vector
        len: usize,
    },

    /// Normalization of a vector whose length is (nearly) zero.
    #[error("Cannot normalize a vector of length {length}")]
    DegenerateVector {
        /// Length of the vector
        length: Float,
    },

    /// An objective was evaluated with fewer coordinates than it has free variables.
    #[error("Objective requires {required} arguments, got {provided}")]
    TooFewArguments {
        /// Number of free variables of the objective
        required: usize,
        /// Number of coordinates supplied
        provided: usize,
    },

    /// The iteration budget was exhausted before the abort criterion was satisfied.
    #[error("Too many iterations: no extremum found within {max_iterations} steps")]
    TooManyIterations {
        /// The exhausted budget
        max_iterations: usize,
    },

    /// A parameter or a combination of parameters is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// IO error while exporting data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while exporting data
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_pickle::Error> for SwarmError {
    fn from(err: serde_pickle::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
