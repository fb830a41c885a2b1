use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    core::{utils::SampleFloat, VectorN},
    error::SwarmResult,
    traits::Objective,
    Float,
};

use super::Direction;

/// A single member of a [`Swarm`](crate::Swarm): a candidate solution with a velocity and a
/// memory of the best position it has visited.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Particle {
    pub(crate) position: VectorN,
    pub(crate) velocity: VectorN,
    pub(crate) current_value: Float,
    pub(crate) best_position: VectorN,
    pub(crate) best_value: Float,
    /// Index of the best neighbour in the owning swarm, recomputed every step.
    #[serde(skip)]
    pub(crate) best_neighbour: Option<usize>,
}

impl Particle {
    /// Create a particle at the origin of a `dimension`-dimensional space with zero velocity.
    pub fn new(dimension: usize) -> Self {
        Self {
            position: VectorN::zeros(dimension),
            velocity: VectorN::zeros(dimension),
            current_value: 0.0,
            best_position: VectorN::zeros(dimension),
            best_value: 0.0,
            best_neighbour: None,
        }
    }
    /// Create a particle with the given position and velocity.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`](crate::SwarmError::DimensionMismatch) if the
    /// two vectors have different lengths.
    pub fn from_parts(position: VectorN, velocity: VectorN) -> SwarmResult<Self> {
        position.check_dimension(&velocity)?;
        Ok(Self {
            best_position: position.clone(),
            position,
            velocity,
            current_value: 0.0,
            best_value: 0.0,
            best_neighbour: None,
        })
    }
    /// The current position.
    pub const fn position(&self) -> &VectorN {
        &self.position
    }
    /// The current velocity.
    pub const fn velocity(&self) -> &VectorN {
        &self.velocity
    }
    /// The objective value at the current position, from the latest evaluation.
    pub const fn current_value(&self) -> Float {
        self.current_value
    }
    /// The best position this particle has visited.
    pub const fn best_position(&self) -> &VectorN {
        &self.best_position
    }
    /// The objective value at [`Particle::best_position`].
    pub const fn best_value(&self) -> Float {
        self.best_value
    }
    /// Index of the best particle within the neighbour radius during the latest
    /// global+local-best step, if any.
    pub const fn best_neighbour(&self) -> Option<usize> {
        self.best_neighbour
    }
    /// Evaluate the objective at the current position and make it the personal best.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation fails (see [`Objective::evaluate`]); the particle is
    /// unchanged in that case.
    pub fn init_fitness(&mut self, objective: &dyn Objective) -> SwarmResult<()> {
        let value = objective.evaluate(&self.position)?;
        self.current_value = value;
        self.best_value = value;
        self.best_position = self.position.clone();
        Ok(())
    }
    /// Evaluate the objective at the current position and replace the personal best if the new
    /// value is better in the given [`Direction`]. The personal best never gets worse.
    ///
    /// # Errors
    ///
    /// Returns an error if the evaluation fails (see [`Objective::evaluate`]); the particle is
    /// unchanged in that case.
    pub fn calculate_fitness(
        &mut self,
        objective: &dyn Objective,
        direction: Direction,
    ) -> SwarmResult<()> {
        let value = objective.evaluate(&self.position)?;
        self.current_value = value;
        if direction.is_better(value, self.best_value) {
            self.best_value = value;
            self.best_position = self.position.clone();
        }
        Ok(())
    }
    /// Update velocity and position with the global-best rule:
    ///
    /// ```math
    /// v \leftarrow w v + c_1 r_1 (p - x) + c_2 r_2 (g - x)
    /// ```
    ///
    /// If the new velocity is at least `max_velocity` long it is rescaled to exactly
    /// `max_velocity`.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`](crate::SwarmError::DimensionMismatch) if
    /// `global_best` does not match the particle's dimension; the particle is unchanged in that
    /// case.
    pub fn calc_new_global(
        &mut self,
        rng: &mut Rng,
        max_velocity: Float,
        c1: Float,
        c2: Float,
        w: Float,
        global_best: &VectorN,
    ) -> SwarmResult<()> {
        let velocity = self.inertial_update(rng, c1, c2, w, global_best)?;
        self.advance(velocity, max_velocity)
    }
    /// Update velocity and position with the global+local-best rule. If `neighbour` (the
    /// position of the best neighbour) is given, the term $`c_3 r_3 (n - x)`$ is added to the
    /// global-best rule; otherwise this is identical to [`Particle::calc_new_global`].
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`](crate::SwarmError::DimensionMismatch) if
    /// `global_best` or `neighbour` does not match the particle's dimension; the particle is
    /// unchanged in that case.
    #[allow(clippy::too_many_arguments)]
    pub fn calc_new_global_and_local(
        &mut self,
        rng: &mut Rng,
        max_velocity: Float,
        c1: Float,
        c2: Float,
        c3: Float,
        w: Float,
        global_best: &VectorN,
        neighbour: Option<&VectorN>,
    ) -> SwarmResult<()> {
        let mut velocity = self.inertial_update(rng, c1, c2, w, global_best)?;
        if let Some(neighbour) = neighbour {
            let local = neighbour.try_sub(&self.position)? * (c3 * rng.float());
            velocity.try_add_assign(&local)?;
        }
        self.advance(velocity, max_velocity)
    }
    fn inertial_update(
        &self,
        rng: &mut Rng,
        c1: Float,
        c2: Float,
        w: Float,
        global_best: &VectorN,
    ) -> SwarmResult<VectorN> {
        let cognitive = self.best_position.try_sub(&self.position)? * (c1 * rng.float());
        let social = global_best.try_sub(&self.position)? * (c2 * rng.float());
        let mut velocity = &self.velocity * w;
        velocity.try_add_assign(&cognitive)?;
        velocity.try_add_assign(&social)?;
        Ok(velocity)
    }
    fn advance(&mut self, mut velocity: VectorN, max_velocity: Float) -> SwarmResult<()> {
        // a zero velocity has no direction and is already within any limit
        if velocity.length() >= max_velocity && velocity.normalize().is_ok() {
            velocity *= max_velocity;
        }
        self.position.try_add_assign(&velocity)?;
        self.velocity = velocity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{traits::FnObjective, SwarmError};
    use approx::assert_relative_eq;

    fn sum_objective() -> FnObjective<impl Fn(&VectorN) -> Float + Clone> {
        FnObjective::new(2, |x: &VectorN| x[0] + x[1])
    }

    #[test]
    fn test_init_fitness_seeds_best() {
        let mut p = Particle::from_parts(
            VectorN::from(vec![1.0, 2.0]),
            VectorN::zeros(2),
        )
        .unwrap();
        p.init_fitness(&sum_objective()).unwrap();
        assert_eq!(p.current_value(), 3.0);
        assert_eq!(p.best_value(), 3.0);
        assert_eq!(p.best_position(), &VectorN::from(vec![1.0, 2.0]));
    }

    #[test]
    fn test_calculate_fitness_ratchets() {
        let f = sum_objective();
        let mut p = Particle::from_parts(VectorN::from(vec![1.0, 1.0]), VectorN::zeros(2)).unwrap();
        p.init_fitness(&f).unwrap();
        p.position = VectorN::from(vec![0.0, 0.0]);
        p.calculate_fitness(&f, Direction::Maximize).unwrap();
        assert_eq!(p.current_value(), 0.0);
        assert_eq!(p.best_value(), 2.0);
        assert_eq!(p.best_position(), &VectorN::from(vec![1.0, 1.0]));
        p.calculate_fitness(&f, Direction::Minimize).unwrap();
        assert_eq!(p.best_value(), 0.0);
        assert_eq!(p.best_position(), &VectorN::zeros(2));
        p.position = VectorN::from(vec![5.0, 5.0]);
        p.calculate_fitness(&f, Direction::Minimize).unwrap();
        assert_eq!(p.current_value(), 10.0);
        assert_eq!(p.best_value(), 0.0);
    }

    #[test]
    fn test_fitness_failure_leaves_particle_unchanged() {
        let f = FnObjective::new(3, |x: &VectorN| x[2]);
        let mut p = Particle::new(2);
        p.current_value = 4.0;
        assert!(matches!(
            p.calculate_fitness(&f, Direction::Maximize),
            Err(SwarmError::TooFewArguments { .. })
        ));
        assert_eq!(p.current_value(), 4.0);
    }

    #[test]
    fn test_inertia_only() {
        let mut rng = Rng::with_seed(0);
        let mut p =
            Particle::from_parts(VectorN::from(vec![1.0, 1.0]), VectorN::from(vec![1.0, -2.0]))
                .unwrap();
        p.calc_new_global(&mut rng, 100.0, 0.0, 0.0, 0.5, &VectorN::zeros(2))
            .unwrap();
        assert_eq!(p.velocity(), &VectorN::from(vec![0.5, -1.0]));
        assert_eq!(p.position(), &VectorN::from(vec![1.5, 0.0]));
    }

    #[test]
    fn test_velocity_clamp() {
        let mut rng = Rng::with_seed(1);
        for _ in 0..100 {
            let mut p = Particle::from_parts(
                VectorN::from(vec![rng.range(-50.0, 50.0), rng.range(-50.0, 50.0)]),
                VectorN::from(vec![rng.range(-5.0, 5.0), rng.range(-5.0, 5.0)]),
            )
            .unwrap();
            let target = VectorN::from(vec![rng.range(-50.0, 50.0), rng.range(-50.0, 50.0)]);
            let before = p.position().clone();
            p.calc_new_global_and_local(
                &mut rng,
                1.5,
                2.0,
                2.0,
                2.0,
                1.0,
                &target,
                Some(&VectorN::from(vec![40.0, -40.0])),
            )
            .unwrap();
            assert!(p.velocity().length() <= 1.5 + 1e-9);
            let moved = p.position().try_sub(&before).unwrap();
            assert!(moved.approx_eq(p.velocity(), 1e-9));
        }
    }

    #[test]
    fn test_clamp_rescales_to_exact_limit() {
        let mut rng = Rng::with_seed(2);
        let mut p = Particle::from_parts(VectorN::zeros(2), VectorN::from(vec![30.0, 40.0])).unwrap();
        p.calc_new_global(&mut rng, 10.0, 0.0, 0.0, 1.0, &VectorN::zeros(2))
            .unwrap();
        assert_relative_eq!(p.velocity().length(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.velocity()[0], 6.0, epsilon = 1e-12);
        assert_relative_eq!(p.velocity()[1], 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_limit_with_zero_velocity() {
        let mut rng = Rng::with_seed(3);
        let mut p = Particle::new(2);
        p.calc_new_global(&mut rng, 0.0, 1.0, 1.0, 1.0, &VectorN::zeros(2))
            .unwrap();
        assert!(p.velocity().is_zero(0.0));
        assert_eq!(p.position(), &VectorN::zeros(2));
    }

    #[test]
    fn test_local_without_neighbour_matches_global() {
        let start = Particle::from_parts(
            VectorN::from(vec![1.0, 2.0]),
            VectorN::from(vec![0.3, -0.1]),
        )
        .unwrap();
        let target = VectorN::from(vec![4.0, -1.0]);
        let mut a = start.clone();
        let mut b = start;
        a.calc_new_global(&mut Rng::with_seed(7), 10.0, 1.5, 1.5, 0.7, &target)
            .unwrap();
        b.calc_new_global_and_local(&mut Rng::with_seed(7), 10.0, 1.5, 1.5, 2.0, 0.7, &target, None)
            .unwrap();
        assert_eq!(a.position().as_slice(), b.position().as_slice());
        assert_eq!(a.velocity().as_slice(), b.velocity().as_slice());
    }

    #[test]
    fn test_neighbour_term_pulls_toward_neighbour() {
        let mut rng = Rng::with_seed(4);
        let mut p = Particle::new(1);
        p.calc_new_global_and_local(
            &mut rng,
            100.0,
            0.0,
            0.0,
            1.0,
            0.0,
            &VectorN::zeros(1),
            Some(&VectorN::from(vec![10.0])),
        )
        .unwrap();
        assert!(p.velocity()[0] >= 0.0);
        assert!(p.position()[0] < 10.0);
    }

    #[test]
    fn test_dimension_mismatch_leaves_particle_unchanged() {
        let mut rng = Rng::with_seed(5);
        let mut p = Particle::from_parts(VectorN::from(vec![1.0, 1.0]), VectorN::zeros(2)).unwrap();
        assert!(matches!(
            p.calc_new_global(&mut rng, 1.0, 1.0, 1.0, 1.0, &VectorN::zeros(3)),
            Err(SwarmError::DimensionMismatch { .. })
        ));
        assert_eq!(p.position(), &VectorN::from(vec![1.0, 1.0]));
        assert!(Particle::from_parts(VectorN::zeros(2), VectorN::zeros(1)).is_err());
    }
}
