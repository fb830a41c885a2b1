use fastrand::Rng;

use crate::{
    core::{utils::generate_scaled_vector_in_box, VectorN},
    error::{SwarmError, SwarmResult},
    traits::Objective,
    Float,
};

use super::{
    ComputationMode, Direction, Particle, StagnationTracker, SwarmConfig, SwarmState, SwarmStatus,
};

/// The local weight is ignored (and no neighbours are searched) below this magnitude.
const LOCAL_WEIGHT_THRESHOLD: Float = 1e-5;
/// Initial velocities are sampled in the bounding box and scaled by this factor.
const INITIAL_VELOCITY_SCALE: Float = 0.01;

/// A population of [`Particle`]s searching for an extremum of an [`Objective`].
///
/// The swarm owns its particles and a copy of the objective. It is advanced one generation at a
/// time with [`Swarm::compute_next_step`] by an external driver, which polls
/// [`Swarm::check_abort_criterion`] between steps (or lets [`Swarm::optimize`] do both).
///
/// The global best and the best neighbour of each particle are stored as indices into the
/// particle collection and recomputed after every mutation of it.
#[derive(Clone)]
pub struct Swarm {
    dimension: usize,
    particles: Vec<Particle>,
    objective: Box<dyn Objective>,
    config: SwarmConfig,
    global_best: Option<usize>,
    stagnation: StagnationTracker,
    iteration_count: usize,
    rng: Rng,
}

impl Swarm {
    /// Create an empty swarm in a `dimension`-dimensional space with the default
    /// [`SwarmConfig`] and an unseeded random number generator.
    pub fn new<O: Objective + 'static>(dimension: usize, objective: O) -> Self {
        Self {
            dimension,
            particles: Vec::default(),
            objective: Box::new(objective),
            config: SwarmConfig::default(),
            global_best: None,
            stagnation: StagnationTracker::default(),
            iteration_count: 0,
            rng: Rng::new(),
        }
    }
    /// Create an empty swarm whose dimension is the arity of `objective` (at least one).
    pub fn from_objective<O: Objective + 'static>(objective: O) -> Self {
        let dimension = objective.arity().max(1);
        Self::new(dimension, objective)
    }
    /// Seed the internal random number generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::with_seed(seed);
        self
    }
    /// Use the given random number generator.
    pub fn with_rng(mut self, rng: Rng) -> Self {
        self.rng = rng;
        self
    }
    /// Convenience method to edit the [`SwarmConfig`] with its chainable setters.
    pub fn configure<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut SwarmConfig) -> &mut SwarmConfig,
    {
        f(&mut self.config);
        self
    }
    /// The current parameters.
    pub const fn config(&self) -> &SwarmConfig {
        &self.config
    }
    /// Replace all parameters at once.
    pub fn set_config(&mut self, config: SwarmConfig) {
        self.config = config;
    }
    /// Sets the cognitive weight.
    pub fn set_c1(&mut self, value: Float) {
        self.config.c1 = value;
    }
    /// Sets the social weight.
    pub fn set_c2(&mut self, value: Float) {
        self.config.c2 = value;
    }
    /// Sets the local weight.
    pub fn set_c3(&mut self, value: Float) {
        self.config.c3 = value;
    }
    /// Sets the inertial weight.
    pub fn set_w(&mut self, value: Float) {
        self.config.w = value;
    }
    /// Sets the neighbour radius.
    pub fn set_neighbour_radius(&mut self, value: Float) {
        self.config.neighbour_radius = value;
    }
    /// Sets the velocity limit.
    pub fn set_max_velocity(&mut self, value: Float) {
        self.config.max_velocity = value;
    }
    /// Sets the floor of the velocity limit.
    pub fn set_min_velocity(&mut self, value: Float) {
        self.config.min_velocity = value;
    }
    /// Enables or disables auto-velocity.
    pub fn set_auto_velocity(&mut self, value: bool) {
        self.config.auto_velocity = value;
    }
    /// Sets the [`ComputationMode`].
    pub fn set_computation_mode(&mut self, value: ComputationMode) {
        self.config.computation_mode = value;
    }
    /// Sets the [`ComputationMode`] from its index (0 = global best, 1 = global and local best).
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfiguration`] for any other index; the mode is unchanged.
    pub fn set_computation_mode_index(&mut self, index: usize) -> SwarmResult<()> {
        self.config.computation_mode = ComputationMode::try_from(index)?;
        Ok(())
    }
    /// Sets the search [`Direction`].
    pub fn set_direction(&mut self, value: Direction) {
        self.config.direction = value;
    }
    /// Enables or disables the abort criterion for drivers.
    pub fn set_abort_enabled(&mut self, value: bool) {
        self.config.abort_enabled = value;
    }
    /// Sets the number of tolerated stagnant checks.
    pub fn set_abort_after(&mut self, value: usize) {
        self.config.abort_after = value;
    }
    /// The objective searched by the swarm.
    pub fn objective(&self) -> &dyn Objective {
        self.objective.as_ref()
    }
    /// Replace the objective. The swarm is cleared since the stored values belong to the old
    /// function.
    pub fn set_objective<O: Objective + 'static>(&mut self, objective: O) {
        self.objective = Box::new(objective);
        self.clear();
    }
    /// The dimension of the search space.
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
    /// Change the dimension of the search space. The swarm is cleared.
    pub fn set_dimension(&mut self, dimension: usize) {
        self.dimension = dimension;
        self.clear();
    }
    /// The particles of the swarm.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
    /// The number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }
    /// Returns `true` if the swarm has no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
    fn check_ready(&self) -> SwarmResult<()> {
        self.config.validate()?;
        if self.objective.is_empty() {
            return Err(SwarmError::InvalidConfiguration(
                "no objective function set".to_string(),
            ));
        }
        let required = self.objective.arity();
        if required > self.dimension {
            return Err(SwarmError::TooFewArguments {
                required,
                provided: self.dimension,
            });
        }
        Ok(())
    }
    /// Replace all particles with `count` new ones inside the box spanned by `min` and `max`.
    ///
    /// For a two-dimensional swarm with `random == false` the particles are centered in the
    /// cells of an approximately square grid covering the box. Otherwise positions are drawn
    /// uniformly in the box. In both cases each velocity component is a uniform sample in the
    /// box scaled by `0.01`.
    ///
    /// The iteration count and the stagnation bookkeeping are reset.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if a bound does not have the swarm's dimension,
    /// [`SwarmError::InvalidConfiguration`] if the box is empty in some axis or the parameters
    /// are invalid, and any error of [`Swarm::compute_next_step`]'s readiness checks. The swarm is
    /// unchanged on failure.
    pub fn create_swarm(
        &mut self,
        count: usize,
        min: &VectorN,
        max: &VectorN,
        random: bool,
    ) -> SwarmResult<()> {
        self.check_ready()?;
        for bound in [min, max] {
            if bound.len() != self.dimension {
                return Err(SwarmError::DimensionMismatch {
                    expected: self.dimension,
                    actual: bound.len(),
                });
            }
        }
        for (axis, (lo, hi)) in min.iter().zip(max.iter()).enumerate() {
            if !(hi > lo) {
                return Err(SwarmError::InvalidConfiguration(format!(
                    "empty bounds on axis {axis}: [{lo}, {hi}]"
                )));
            }
        }
        let positions = if self.dimension == 2 && !random {
            grid_positions(count, min, max)
        } else {
            Vec::default()
        };
        let mut particles = Vec::with_capacity(count);
        for k in 0..count {
            let position = match positions.get(k) {
                Some(position) => position.clone(),
                None => generate_scaled_vector_in_box(min, max, 1.0, &mut self.rng),
            };
            let velocity =
                generate_scaled_vector_in_box(min, max, INITIAL_VELOCITY_SCALE, &mut self.rng);
            let mut particle = Particle::from_parts(position, velocity)?;
            particle.init_fitness(self.objective.as_ref())?;
            particles.push(particle);
        }
        self.particles = particles;
        self.iteration_count = 0;
        self.stagnation.reset();
        self.find_global_best();
        Ok(())
    }
    /// Append a particle at `(x, y)` with zero velocity. The iteration count is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::DimensionMismatch`] if the swarm is not two-dimensional, or any
    /// error of the readiness checks (see [`Swarm::create_swarm`]). The swarm is unchanged on
    /// failure.
    pub fn add_particle_2d(&mut self, x: Float, y: Float) -> SwarmResult<()> {
        self.check_ready()?;
        if self.dimension != 2 {
            return Err(SwarmError::DimensionMismatch {
                expected: 2,
                actual: self.dimension,
            });
        }
        let mut particle = Particle::from_parts(VectorN::from(vec![x, y]), VectorN::zeros(2))?;
        particle.init_fitness(self.objective.as_ref())?;
        self.particles.push(particle);
        self.find_global_best();
        Ok(())
    }
    /// Remove all particles. Calling this on an empty swarm does nothing.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.global_best = None;
    }
    /// Recompute the index of the particle with the best personal best value. Ties go to the
    /// particle which comes first.
    pub fn find_global_best(&mut self) -> Option<usize> {
        let direction = self.config.direction;
        self.global_best = self
            .particles
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, Float)>, (i, p)| match best {
                Some((_, value)) if !direction.is_better(p.best_value, value) => best,
                _ => Some((i, p.best_value)),
            })
            .map(|(i, _)| i);
        self.global_best
    }
    fn find_neighbours(&mut self) {
        let direction = self.config.direction;
        let radius = self.config.neighbour_radius;
        let neighbours: Vec<Option<usize>> = (0..self.particles.len())
            .map(|i| {
                let position = &self.particles[i].position;
                let mut best: Option<usize> = None;
                for (j, other) in self.particles.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let within = position
                        .distance(&other.position)
                        .is_ok_and(|d| d < radius);
                    if !within {
                        continue;
                    }
                    match best {
                        Some(b)
                            if !direction
                                .is_better(other.current_value, self.particles[b].current_value) => {}
                        _ => best = Some(j),
                    }
                }
                best
            })
            .collect();
        for (particle, neighbour) in self.particles.iter_mut().zip(neighbours) {
            particle.best_neighbour = neighbour;
        }
    }
    fn clear_neighbours(&mut self) {
        for particle in &mut self.particles {
            particle.best_neighbour = None;
        }
    }
    /// Record the global best value and report whether the swarm has stagnated for more than
    /// [`SwarmConfig::abort_after`] checks (see [`StagnationTracker::check`]).
    ///
    /// This does not advance the simulation, but it does update the stagnation counter which
    /// also drives auto-velocity. It is evaluated regardless of
    /// [`SwarmConfig::abort_enabled`]; honoring that flag is up to the driver.
    pub fn check_abort_criterion(&mut self) -> bool {
        let best = self.best_particle().map(Particle::best_value);
        self.stagnation.check(best, self.config.abort_after)
    }
    /// Advance the swarm by one generation.
    ///
    /// 1. In [`ComputationMode::GlobalAndLocalBest`] with a non-negligible local weight, every
    ///    particle looks up the particle within the neighbour radius with the best *current*
    ///    value.
    /// 2. Every particle updates its velocity and position, in order, toward the global best
    ///    captured at the start of the step.
    /// 3. Every particle is re-evaluated, the iteration count is incremented and the global best
    ///    (by personal best value) is recomputed.
    /// 4. With auto-velocity, the velocity limit moves halfway toward its floor if the latest
    ///    abort check found the swarm stagnant.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfiguration`] if the parameters are invalid or there is no
    /// objective, and [`SwarmError::TooFewArguments`] if the objective needs more variables than
    /// the swarm's dimension. Nothing is modified in that case.
    pub fn compute_next_step(&mut self) -> SwarmResult<()> {
        self.check_ready()?;
        let global_best_position = self
            .best_particle()
            .map_or_else(|| VectorN::zeros(self.dimension), |p| p.best_position.clone());
        let SwarmConfig {
            c1,
            c2,
            c3,
            w,
            max_velocity,
            computation_mode,
            direction,
            ..
        } = self.config;
        let local = matches!(computation_mode, ComputationMode::GlobalAndLocalBest);
        if local && c3.abs() > LOCAL_WEIGHT_THRESHOLD {
            self.find_neighbours();
        } else {
            self.clear_neighbours();
        }
        for i in 0..self.particles.len() {
            if local {
                // neighbours move in the same pass, so read the position at update time
                let neighbour = self.particles[i]
                    .best_neighbour
                    .map(|j| self.particles[j].position.clone());
                self.particles[i].calc_new_global_and_local(
                    &mut self.rng,
                    max_velocity,
                    c1,
                    c2,
                    c3,
                    w,
                    &global_best_position,
                    neighbour.as_ref(),
                )?;
            } else {
                self.particles[i].calc_new_global(
                    &mut self.rng,
                    max_velocity,
                    c1,
                    c2,
                    w,
                    &global_best_position,
                )?;
            }
        }
        for particle in &mut self.particles {
            particle.calculate_fitness(self.objective.as_ref(), direction)?;
        }
        self.iteration_count += 1;
        self.find_global_best();
        if self.config.auto_velocity && self.stagnation.stagnant_iterations() != 0 {
            self.config.max_velocity -= (self.config.max_velocity - self.config.min_velocity) / 2.0;
        }
        Ok(())
    }
    /// Step until the abort criterion is met, checking it before every step. Returns the number
    /// of steps taken.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::TooManyIterations`] after exactly `max_iterations` steps without
    /// convergence, or any error of [`Swarm::compute_next_step`].
    pub fn optimize(&mut self, max_iterations: usize) -> SwarmResult<usize> {
        for i in 0..max_iterations {
            if self.check_abort_criterion() {
                return Ok(i);
            }
            self.compute_next_step()?;
        }
        Err(SwarmError::TooManyIterations { max_iterations })
    }
    /// Steps taken since the particles were placed.
    pub const fn iteration_count(&self) -> usize {
        self.iteration_count
    }
    /// The particle holding the global best, if any.
    pub fn best_particle(&self) -> Option<&Particle> {
        self.global_best.and_then(|i| self.particles.get(i))
    }
    /// The index of [`Swarm::best_particle`].
    pub const fn best_index(&self) -> Option<usize> {
        self.global_best
    }
    /// The global best value, or `0.0` for an empty swarm.
    pub fn best_value(&self) -> Float {
        self.best_particle().map_or(0.0, Particle::best_value)
    }
    /// The position of the global best.
    pub fn best_position(&self) -> Option<&VectorN> {
        self.best_particle().map(Particle::best_position)
    }
    /// The mean of the particles' current values, or `0.0` for an empty swarm.
    pub fn average_value(&self) -> Float {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.particles.iter().map(|p| p.current_value).sum::<Float>() / self.particles.len() as Float
    }
    /// The current velocity limit.
    pub const fn max_velocity(&self) -> Float {
        self.config.max_velocity
    }
    /// Consecutive stagnant abort checks so far.
    pub const fn stagnant_iterations(&self) -> usize {
        self.stagnation.stagnant_iterations()
    }
    /// The coarse [`SwarmState`].
    pub fn state(&self) -> SwarmState {
        if self.particles.is_empty() {
            SwarmState::Empty
        } else if self.iteration_count == 0 {
            SwarmState::Ready
        } else {
            SwarmState::Iterating
        }
    }
    /// A snapshot of the swarm.
    pub fn status(&self) -> SwarmStatus {
        SwarmStatus {
            iteration_count: self.iteration_count,
            best_value: self.best_particle().map(Particle::best_value),
            best_position: self.best_position().cloned(),
            average_value: self.average_value(),
            max_velocity: self.config.max_velocity,
            n_particles: self.particles.len(),
            stagnant_iterations: self.stagnation.stagnant_iterations(),
            state: self.state(),
        }
    }
}

/// Cell centers of a grid over a two-dimensional box, column by column, truncated to `count`.
fn grid_positions(count: usize, min: &VectorN, max: &VectorN) -> Vec<VectorN> {
    let n = (count as Float).sqrt().floor() as usize;
    let mut nx = n;
    let mut ny = n;
    if count > nx * ny {
        nx += 1;
        if count > nx * ny {
            ny += 1;
        }
    }
    let step_x = (max[0] - min[0]) / nx as Float;
    let step_y = (max[1] - min[1]) / ny as Float;
    (0..nx)
        .flat_map(|i| (0..ny).map(move |j| (i, j)))
        .take(count)
        .map(|(i, j)| {
            VectorN::from(vec![
                min[0] + step_x * i as Float + step_x / 2.0,
                min[1] + step_y * j as Float + step_y / 2.0,
            ])
        })
        .collect()
}
