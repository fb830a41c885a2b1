use dyn_clone::DynClone;

use crate::{
    core::VectorN,
    error::{SwarmError, SwarmResult},
    Float,
};

/// A trait which describes a scalar function $`f(\mathbb{R}^n) \to \mathbb{R}`$ searched by a
/// [`Swarm`](crate::Swarm).
///
/// Implementors provide [`Objective::value`] and the number of free variables they read
/// ([`Objective::arity`]). The swarm always calls [`Objective::evaluate`], which checks that the
/// position carries enough coordinates first.
///
/// Objectives are cloned into the swarm (see [`dyn_clone`]), so a swarm always works on its own
/// copy of the function.
pub trait Objective: DynClone {
    /// The number of free variables the function uses.
    fn arity(&self) -> usize;
    /// Returns `true` if there is no function to evaluate (e.g. an unset expression).
    fn is_empty(&self) -> bool {
        false
    }
    /// The value of the function at `x`. `x` is guaranteed to have at least
    /// [`Objective::arity`] components when called through [`Objective::evaluate`].
    fn value(&self, x: &VectorN) -> Float;
    /// Evaluate the function at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::TooFewArguments`] if `x` has fewer components than
    /// [`Objective::arity`].
    fn evaluate(&self, x: &VectorN) -> SwarmResult<Float> {
        let required = self.arity();
        if x.len() < required {
            return Err(SwarmError::TooFewArguments {
                required,
                provided: x.len(),
            });
        }
        Ok(self.value(x))
    }
}
dyn_clone::clone_trait_object!(Objective);

/// An [`Objective`] built from a closure.
///
/// ```rust
/// use pso_engine::prelude::*;
///
/// let f = FnObjective::new(2, |x: &VectorN| x[0] * x[1]);
/// assert_eq!(f.evaluate(&VectorN::from(vec![2.0, 3.0])).unwrap(), 6.0);
/// assert!(f.evaluate(&VectorN::from(vec![2.0])).is_err());
/// ```
#[derive(Clone)]
pub struct FnObjective<F> {
    arity: usize,
    func: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&VectorN) -> Float + Clone,
{
    /// Wrap `func`, which reads the first `arity` components of its argument.
    pub const fn new(arity: usize, func: F) -> Self {
        Self { arity, func }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&VectorN) -> Float + Clone,
{
    fn arity(&self) -> usize {
        self.arity
    }
    fn value(&self, x: &VectorN) -> Float {
        (self.func)(x)
    }
}

/// An [`Objective`] without a function, the state of a freshly started application before any
/// expression was entered. A swarm refuses to run on it.
#[derive(Clone, Copy, Default)]
pub struct EmptyObjective;

impl Objective for EmptyObjective {
    fn arity(&self) -> usize {
        0
    }
    fn is_empty(&self) -> bool {
        true
    }
    fn value(&self, _x: &VectorN) -> Float {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_check() {
        let f = FnObjective::new(3, |x: &VectorN| x.iter().sum());
        assert_eq!(f.arity(), 3);
        assert!(!f.is_empty());
        assert_eq!(f.evaluate(&VectorN::from(vec![1.0, 2.0, 3.0])).unwrap(), 6.0);
        assert_eq!(
            f.evaluate(&VectorN::from(vec![1.0, 2.0, 3.0, 4.0]))
                .unwrap(),
            10.0
        );
        assert!(matches!(
            f.evaluate(&VectorN::zeros(2)),
            Err(SwarmError::TooFewArguments {
                required: 3,
                provided: 2
            })
        ));
    }

    #[test]
    fn test_boxed_clone() {
        let offset = 5.0;
        let f: Box<dyn Objective> = Box::new(FnObjective::new(1, move |x: &VectorN| x[0] + offset));
        let g = f.clone();
        assert_eq!(g.evaluate(&VectorN::from(vec![1.0])).unwrap(), 6.0);
    }

    #[test]
    fn test_empty() {
        let f = EmptyObjective;
        assert!(f.is_empty());
        assert_eq!(f.arity(), 0);
    }
}
