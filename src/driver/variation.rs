use serde::{Deserialize, Serialize};

use crate::{
    algorithms::particles::{ComputationMode, SwarmConfig},
    core::{utils::maybe_warn, NopAbortSignal, VectorN},
    error::{SwarmError, SwarmResult},
    traits::AbortSignal,
    Float, Swarm,
};

const DEFAULT_MAX_ITERATIONS: usize = 10000;
const DEFAULT_PARTICLE_COUNT: usize = 20;

/// The swarm parameter swept by a [`Variation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariationVariable {
    /// Number of particles (values are truncated to integers).
    Particles,
    /// Cognitive weight.
    C1,
    /// Social weight.
    C2,
    /// Local weight (requires [`ComputationMode::GlobalAndLocalBest`]).
    C3,
    /// Inertial weight.
    W,
    /// Neighbour radius (requires [`ComputationMode::GlobalAndLocalBest`]).
    Radius,
    /// Initial velocity limit.
    MaxVelocity,
}

impl VariationVariable {
    /// The default `(from, to, step)` of a sweep over this variable.
    pub const fn default_range(self) -> (Float, Float, Float) {
        match self {
            Self::Particles => (1.0, 100.0, 1.0),
            _ => (0.0, 4.0, 0.1),
        }
    }
    const fn needs_local_mode(self) -> bool {
        matches!(self, Self::C3 | Self::Radius)
    }
    fn apply(self, swarm: &mut Swarm, value: Float) {
        match self {
            Self::Particles => {}
            Self::C1 => swarm.set_c1(value),
            Self::C2 => swarm.set_c2(value),
            Self::C3 => swarm.set_c3(value),
            Self::W => swarm.set_w(value),
            Self::Radius => swarm.set_neighbour_radius(value),
            Self::MaxVelocity => swarm.set_max_velocity(value),
        }
    }
}

/// The averaged outcome of one sweep point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariationSample {
    /// The value of the swept variable.
    pub value: Float,
    /// Mean number of steps needed to meet the abort criterion.
    pub mean_iterations: Float,
    /// Mean global best value at convergence.
    pub mean_best_value: Float,
}

/// A parameter sweep: for every value of one [`VariationVariable`] the swarm is re-created and
/// optimized several times, and the mean number of iterations to convergence is recorded.
///
/// ```rust
/// use pso_engine::prelude::*;
/// use pso_engine::test_functions::Sphere;
///
/// let mut swarm = Swarm::new(2, Sphere { n: 2 }).with_seed(0);
/// swarm.configure(|c| c.with_direction(Direction::Minimize).with_w(0.6).with_c1(1.4).with_c2(1.4));
/// let samples = Variation::new(
///     VariationVariable::Particles,
///     VectorN::from(vec![-2.0, -2.0]),
///     VectorN::from(vec![2.0, 2.0]),
/// )
/// .with_range(5.0, 20.0, 5.0)
/// .with_average_number(2)
/// .run(&mut swarm)
/// .unwrap();
/// assert_eq!(samples.len(), 3);
/// assert_eq!(samples[2].value, 15.0);
/// ```
pub struct Variation {
    variable: VariationVariable,
    from: Float,
    to: Float,
    step: Float,
    average_number: usize,
    max_iterations: usize,
    particle_count: usize,
    random: bool,
    min: VectorN,
    max: VectorN,
    abort_signal: Box<dyn AbortSignal>,
}

impl Variation {
    /// Sweep `variable` over its [default range](VariationVariable::default_range), creating
    /// swarms inside the box spanned by `min` and `max`.
    pub fn new(variable: VariationVariable, min: VectorN, max: VectorN) -> Self {
        let (from, to, step) = variable.default_range();
        Self {
            variable,
            from,
            to,
            step,
            average_number: 1,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            particle_count: DEFAULT_PARTICLE_COUNT,
            random: true,
            min,
            max,
            abort_signal: Box::new(NopAbortSignal),
        }
    }
    /// Sweep from `from` (inclusive) to `to` (exclusive) in increments of `step`.
    pub fn with_range(mut self, from: Float, to: Float, step: Float) -> Self {
        self.from = from;
        self.to = to;
        self.step = step;
        self
    }
    /// Number of optimizations averaged per sweep point (default = `1`).
    pub fn with_average_number(mut self, value: usize) -> Self {
        self.average_number = value;
        self
    }
    /// Iteration budget of each optimization (default = `10000`).
    pub fn with_max_iterations(mut self, value: usize) -> Self {
        self.max_iterations = value;
        self
    }
    /// Number of particles when the particle count is not the swept variable (default = `20`).
    pub fn with_particle_count(mut self, value: usize) -> Self {
        self.particle_count = value;
        self
    }
    /// Random (`true`, the default) or grid layout of the created swarms.
    pub fn with_random(mut self, value: bool) -> Self {
        self.random = value;
        self
    }
    /// Set the [`AbortSignal`] checked between sweep points.
    pub fn with_abort_signal<A: AbortSignal + 'static>(mut self, abort_signal: A) -> Self {
        self.abort_signal = Box::new(abort_signal);
        self
    }
    /// The values visited by the sweep, generated on demand.
    pub fn values(&self) -> impl Iterator<Item = Float> {
        let (from, to, step) = (self.from, self.to, self.step);
        (0_usize..)
            .map(move |k| (k as Float).mul_add(step, from))
            .take_while(move |&value| value < to)
    }
    fn validate(&self, swarm: &Swarm) -> SwarmResult<()> {
        if !(self.from.is_finite() && self.to.is_finite()) {
            return Err(SwarmError::InvalidConfiguration(format!(
                "sweep range must be finite, got {} to {}",
                self.from, self.to
            )));
        }
        if !(self.from < self.to) {
            return Err(SwarmError::InvalidConfiguration(format!(
                "from value {} should be less than to value {}",
                self.from, self.to
            )));
        }
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(SwarmError::InvalidConfiguration(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.from + self.step == self.from {
            return Err(SwarmError::InvalidConfiguration(format!(
                "step {} is too small to advance from {}",
                self.step, self.from
            )));
        }
        if self.average_number == 0 {
            return Err(SwarmError::InvalidConfiguration(
                "at least one run per value is required".to_string(),
            ));
        }
        if self.variable == VariationVariable::Particles && self.from < 1.0 {
            return Err(SwarmError::InvalidConfiguration(format!(
                "a swarm needs at least one particle, got {}",
                self.from
            )));
        }
        for bound in [&self.min, &self.max] {
            if bound.len() != swarm.dimension() {
                return Err(SwarmError::DimensionMismatch {
                    expected: swarm.dimension(),
                    actual: bound.len(),
                });
            }
        }
        if self.min.iter().zip(self.max.iter()).any(|(lo, hi)| !(hi > lo)) {
            return Err(SwarmError::InvalidConfiguration(
                "every upper bound must exceed its lower bound".to_string(),
            ));
        }
        if self.variable.needs_local_mode()
            && swarm.config().computation_mode != ComputationMode::GlobalAndLocalBest
        {
            return Err(SwarmError::InvalidConfiguration(
                "wrong settings for radius".to_string(),
            ));
        }
        Ok(())
    }
    /// Run the sweep on `swarm` and return one [`VariationSample`] per value.
    ///
    /// Each run restores the swarm's parameters as they were when the sweep started (so an
    /// auto-velocity run never leaks a shrunken velocity limit into the next one), re-creates the
    /// particles, applies the swept value and calls [`Swarm::optimize`]. The parameters are
    /// restored again when the sweep ends. The swarm keeps the particles of the last run.
    ///
    /// If the abort signal is raised the sweep stops between two values and returns the samples
    /// collected so far.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfiguration`] or [`SwarmError::DimensionMismatch`] if the
    /// sweep settings are unusable (the swarm is untouched in that case), and the first error of
    /// any run, notably [`SwarmError::TooManyIterations`] if a run does not converge.
    pub fn run(&mut self, swarm: &mut Swarm) -> SwarmResult<Vec<VariationSample>> {
        self.validate(swarm)?;
        self.abort_signal.reset();
        let base = swarm.config().clone();
        let result = self.sweep(swarm, &base);
        swarm.set_config(base);
        result
    }
    fn sweep(&self, swarm: &mut Swarm, base: &SwarmConfig) -> SwarmResult<Vec<VariationSample>> {
        let mut samples = Vec::default();
        let mut warned = false;
        for value in self.values() {
            if self.abort_signal.is_aborted() {
                maybe_warn(&format!(
                    "Variation stopped by abort signal after {} values",
                    samples.len()
                ));
                break;
            }
            let count = if self.variable == VariationVariable::Particles {
                if value.fract() != 0.0 && !warned {
                    maybe_warn(&format!(
                        "Particle count {value} is not an integer and will be truncated"
                    ));
                    warned = true;
                }
                value as usize
            } else {
                self.particle_count
            };
            let mut iterations = 0.0;
            let mut best = 0.0;
            for _ in 0..self.average_number {
                swarm.set_config(base.clone());
                swarm.create_swarm(count, &self.min, &self.max, self.random)?;
                self.variable.apply(swarm, value);
                iterations += swarm.optimize(self.max_iterations)? as Float;
                best += swarm.best_value();
            }
            samples.push(VariationSample {
                value,
                mean_iterations: iterations / self.average_number as Float,
                mean_best_value: best / self.average_number as Float,
            });
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::AtomicAbortSignal,
        test_functions::Sphere,
        traits::FnObjective,
        Direction,
    };
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn bounds() -> (VectorN, VectorN) {
        (
            VectorN::from(vec![-2.0, -2.0]),
            VectorN::from(vec![2.0, 2.0]),
        )
    }

    fn sphere_swarm() -> Swarm {
        let mut swarm = Swarm::new(2, Sphere { n: 2 }).with_seed(3);
        swarm.configure(|c| {
            c.with_direction(Direction::Minimize)
                .with_w(0.6)
                .with_c1(1.2)
                .with_c2(1.2)
        });
        swarm
    }

    #[test]
    fn test_values_exclusive_upper() {
        let (min, max) = bounds();
        let v = Variation::new(VariationVariable::W, min, max).with_range(0.0, 1.0, 0.25);
        assert_eq!(v.values().collect::<Vec<_>>(), vec![0.0, 0.25, 0.5, 0.75]);
        let (min, max) = bounds();
        assert_eq!(
            Variation::new(VariationVariable::Particles, min, max).values().count(),
            99
        );
    }

    #[test]
    fn test_constant_objective_sweep() {
        let mut swarm = Swarm::new(2, FnObjective::new(0, |_: &VectorN| 2.0)).with_seed(0);
        let (min, max) = bounds();
        let samples = Variation::new(VariationVariable::C1, min, max)
            .with_range(0.5, 2.0, 0.5)
            .with_average_number(3)
            .run(&mut swarm)
            .unwrap();
        assert_eq!(samples.len(), 3);
        for (sample, value) in samples.iter().zip([0.5, 1.0, 1.5]) {
            assert_relative_eq!(sample.value, value);
            assert_relative_eq!(sample.mean_iterations, 3.0);
            assert_relative_eq!(sample.mean_best_value, 2.0);
        }
        // parameters are restored
        assert_eq!(swarm.config().c1, 2.0);
    }

    #[test]
    fn test_particle_sweep_creates_swarms() {
        let mut swarm = sphere_swarm();
        let (min, max) = bounds();
        let samples = Variation::new(VariationVariable::Particles, min, max)
            .with_range(4.0, 10.0, 3.0)
            .run(&mut swarm)
            .unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(swarm.len(), 7);
        assert!(samples.iter().all(|s| s.mean_iterations >= 3.0));
    }

    #[test]
    fn test_velocity_is_reset_between_runs() {
        let mut swarm = Swarm::new(2, FnObjective::new(0, |_: &VectorN| 1.0)).with_seed(1);
        swarm.configure(|c| c.with_auto_velocity(true).with_abort_after(3));
        let (min, max) = bounds();
        Variation::new(VariationVariable::W, min, max)
            .with_range(0.5, 1.0, 0.25)
            .with_average_number(2)
            .run(&mut swarm)
            .unwrap();
        assert_eq!(swarm.max_velocity(), 10.0);
    }

    #[test]
    fn test_validation() {
        let mut swarm = sphere_swarm();
        let (min, max) = bounds();
        let mut v = Variation::new(VariationVariable::W, min.clone(), max.clone())
            .with_range(2.0, 1.0, 0.1);
        assert!(matches!(
            v.run(&mut swarm),
            Err(SwarmError::InvalidConfiguration(_))
        ));
        let mut v = Variation::new(VariationVariable::W, min.clone(), max.clone())
            .with_range(0.0, 1.0, 0.0);
        assert!(v.run(&mut swarm).is_err());
        let mut v = Variation::new(VariationVariable::W, min.clone(), max.clone())
            .with_average_number(0);
        assert!(v.run(&mut swarm).is_err());
        let mut v = Variation::new(VariationVariable::Radius, min.clone(), max.clone());
        assert!(matches!(
            v.run(&mut swarm),
            Err(SwarmError::InvalidConfiguration(msg)) if msg == "wrong settings for radius"
        ));
        let mut v = Variation::new(
            VariationVariable::W,
            VectorN::from(vec![0.0]),
            VectorN::from(vec![1.0]),
        );
        assert!(matches!(
            v.run(&mut swarm),
            Err(SwarmError::DimensionMismatch { .. })
        ));
        let mut v = Variation::new(VariationVariable::W, max, min);
        assert!(v.run(&mut swarm).is_err());
        assert!(swarm.is_empty());
    }

    #[test]
    fn test_unbounded_range_refused() {
        let mut swarm = sphere_swarm();
        let (min, max) = bounds();
        for (from, to, step) in [
            (0.0, Float::INFINITY, 1.0),
            (Float::NEG_INFINITY, 1.0, 1.0),
            (Float::NAN, 1.0, 0.1),
            (1e20, 2e20, 1.0),
        ] {
            let mut v = Variation::new(VariationVariable::W, min.clone(), max.clone())
                .with_range(from, to, step);
            assert!(matches!(
                v.run(&mut swarm),
                Err(SwarmError::InvalidConfiguration(_))
            ));
        }
        assert!(swarm.is_empty());
        let v = Variation::new(VariationVariable::W, min, max)
            .with_range(0.0, Float::INFINITY, 1.0);
        assert_eq!(v.values().take(3).collect::<Vec<_>>(), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_budget_exhaustion_aborts_sweep() {
        let mut swarm = Swarm::new(2, FnObjective::new(1, |x: &VectorN| x[0])).with_seed(2);
        let (min, max) = bounds();
        let result = Variation::new(VariationVariable::C2, min, max)
            .with_range(1.0, 2.0, 0.5)
            .with_max_iterations(3)
            .run(&mut swarm);
        assert!(matches!(
            result,
            Err(SwarmError::TooManyIterations { max_iterations: 3 })
        ));
        assert_eq!(swarm.config().c2, 2.0);
    }

    #[test]
    fn test_abort_signal_stops_between_values() {
        let signal = Arc::new(AtomicAbortSignal::new());
        let mut swarm = Swarm::new(2, FnObjective::new(0, |_: &VectorN| 2.0)).with_seed(0);
        let (min, max) = bounds();
        let mut variation = Variation::new(VariationVariable::MaxVelocity, min.clone(), max.clone())
            .with_range(1.0, 5.0, 1.0)
            .with_abort_signal(signal.clone());
        // the signal is reset when the sweep starts
        signal.abort();
        assert_eq!(variation.run(&mut swarm).unwrap().len(), 4);

        // raised while the first value is running
        let handle = signal.clone();
        let mut swarm = Swarm::new(
            2,
            FnObjective::new(0, move |_: &VectorN| {
                handle.abort();
                2.0
            }),
        )
        .with_seed(0);
        let samples = Variation::new(VariationVariable::MaxVelocity, min, max)
            .with_range(1.0, 5.0, 1.0)
            .with_abort_signal(signal.clone())
            .run(&mut swarm)
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_relative_eq!(samples[0].value, 1.0);
    }
}
