use crate::{core::VectorN, traits::Objective, Float};

/// The Rosenbrock function, a non-convex function with a single minimum.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^{n-1} \left[100(x_{i+1} - x_i^2)^2 + (1 - x_i)^2 \right]
/// ```
/// where $`n \geq 2`$. This function has a minimum at $`f(\vec{1}) = 0`$.
#[derive(Clone, Copy, Debug)]
pub struct Rosenbrock {
    /// The number of dimensions of the function (must be >= 2).
    pub n: usize,
}
impl Objective for Rosenbrock {
    fn arity(&self) -> usize {
        self.n
    }
    fn value(&self, x: &VectorN) -> Float {
        #[allow(clippy::suboptimal_flops)]
        (0..self.n.saturating_sub(1))
            .map(|i| 100.0 * (x[i + 1] - x[i].powi(2)).powi(2) + (1.0 - x[i]).powi(2))
            .sum()
    }
}
