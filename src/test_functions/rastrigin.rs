use crate::{core::VectorN, traits::Objective, Float, PI};

/// The Rastrigin function, a non-convex function with a single minimum but many local minima.
///
/// ```math
/// f(\vec{x}) = 10n + \sum_{i=1}^n (x_i^2 - 10cos(2\pi x_i))
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Rastrigin {
    /// The number of dimensions of the function.
    pub n: usize,
}
impl Objective for Rastrigin {
    fn arity(&self) -> usize {
        self.n
    }
    fn value(&self, x: &VectorN) -> Float {
        #[allow(clippy::suboptimal_flops)]
        let sum = (0..self.n)
            .map(|i| x[i].powi(2) - 10.0 * Float::cos(2.0 * PI * x[i]))
            .sum::<Float>();
        10.0 * self.n as Float + sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_rastrigin() {
        let f = Rastrigin { n: 3 };
        assert_abs_diff_eq!(f.evaluate(&VectorN::zeros(3)).unwrap(), 0.0, epsilon = 1e-12);
        // integer points sit on the cosine peaks
        assert_abs_diff_eq!(
            f.evaluate(&VectorN::from(vec![1.0, 0.0, -2.0])).unwrap(),
            5.0,
            epsilon = 1e-9
        );
        assert!(f.evaluate(&VectorN::zeros(2)).is_err());
    }
}
