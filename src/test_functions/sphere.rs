use crate::{core::VectorN, traits::Objective, Float};

/// The sphere function, a convex bowl with a single minimum.
///
/// ```math
/// f(\vec{x}) = \sum_{i=1}^n x_i^2
/// ```
/// This function has a minimum at $`f(\vec{0}) = 0`$.
#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    /// The number of dimensions of the function.
    pub n: usize,
}
impl Objective for Sphere {
    fn arity(&self) -> usize {
        self.n
    }
    fn value(&self, x: &VectorN) -> Float {
        (0..self.n).map(|i| x[i].powi(2)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere() {
        let f = Sphere { n: 2 };
        assert_eq!(f.evaluate(&VectorN::zeros(2)).unwrap(), 0.0);
        assert_eq!(f.evaluate(&VectorN::from(vec![3.0, 4.0])).unwrap(), 25.0);
        // extra coordinates are ignored
        assert_eq!(
            f.evaluate(&VectorN::from(vec![1.0, 1.0, 7.0])).unwrap(),
            2.0
        );
    }
}
