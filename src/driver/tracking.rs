use std::{fs::File, io::BufWriter, ops::ControlFlow, path::Path, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::{
    algorithms::particles::Particle,
    core::{Vector3, VectorN},
    error::SwarmResult,
    traits::SwarmObserver,
    Swarm,
};

/// A [`SwarmObserver`] which stores the swarm particles' history as well as the history of
/// global best positions.
///
/// For two-dimensional swarms it also keeps one trace per particle of `(x, y, value)` points,
/// which is what a surface plot draws behind each particle. The traces start over whenever the
/// observed iteration count goes backwards, i.e. after the swarm was re-created.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct TrackingObserver {
    /// The history of the swarm particles
    pub history: Vec<Vec<Particle>>,
    /// The history of the best position in the swarm
    pub best_history: Vec<Option<VectorN>>,
    /// Per-particle `(x, y, current value)` traces of a two-dimensional swarm
    pub traces: Vec<Vec<Vector3>>,
    #[serde(skip)]
    last_step: usize,
}

impl TrackingObserver {
    /// Finalize the [`SwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }
    /// Export the recorded history to a Python `.pkl` file.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::Io`](crate::SwarmError::Io) if the file cannot be created and
    /// [`SwarmError::Serialization`](crate::SwarmError::Serialization) if pickling fails.
    pub fn write_pickle<P: AsRef<Path>>(&self, path: P) -> SwarmResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_pickle::to_writer(&mut writer, self, Default::default())?;
        Ok(())
    }
    fn record_traces(&mut self, swarm: &Swarm) {
        if swarm.dimension() != 2 {
            return;
        }
        self.traces.resize_with(swarm.len(), Vec::default);
        for (trace, particle) in self.traces.iter_mut().zip(swarm.particles()) {
            let x = particle.position();
            trace.push(Vector3::new(x[0], x[1], particle.current_value()));
        }
    }
}

impl SwarmObserver for TrackingObserver {
    fn callback(&mut self, step: usize, swarm: &Swarm) -> ControlFlow<()> {
        if step <= self.last_step {
            self.traces.clear();
        }
        self.last_step = step;
        self.history.push(swarm.particles().to_vec());
        self.best_history.push(swarm.best_position().cloned());
        self.record_traces(swarm);
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{driver::SwarmRunner, test_functions::Sphere};

    fn runner(tracker: Arc<RwLock<TrackingObserver>>) -> SwarmRunner {
        let mut swarm = Swarm::new(2, Sphere { n: 2 }).with_seed(11);
        swarm.set_abort_enabled(false);
        swarm
            .create_swarm(
                4,
                &VectorN::from(vec![-1.0, -1.0]),
                &VectorN::from(vec![1.0, 1.0]),
                false,
            )
            .unwrap();
        SwarmRunner::new(swarm).setup(|r| r.add_observer(tracker.clone()))
    }

    #[test]
    fn test_records_history_and_traces() {
        let tracker = TrackingObserver::build();
        let mut runner = runner(tracker.clone());
        runner.run(5).unwrap();
        let t = tracker.read();
        assert_eq!(t.history.len(), 5);
        assert_eq!(t.best_history.len(), 5);
        assert_eq!(t.traces.len(), 4);
        assert!(t.traces.iter().all(|trace| trace.len() == 5));
        let last = &runner.swarm().particles()[0];
        let point = t.traces[0][4];
        assert_eq!(point.x(), last.position()[0]);
        assert_eq!(point.z(), last.current_value());
    }

    #[test]
    fn test_traces_restart_after_recreation() {
        let tracker = TrackingObserver::build();
        let mut runner = runner(tracker.clone());
        runner.run(3).unwrap();
        runner
            .swarm_mut()
            .create_swarm(
                2,
                &VectorN::from(vec![-1.0, -1.0]),
                &VectorN::from(vec![1.0, 1.0]),
                true,
            )
            .unwrap();
        runner.run(2).unwrap();
        let t = tracker.read();
        assert_eq!(t.history.len(), 5);
        assert_eq!(t.traces.len(), 2);
        assert!(t.traces.iter().all(|trace| trace.len() == 2));
    }

    #[test]
    fn test_no_traces_in_3d() {
        let mut tracker = TrackingObserver::default();
        let mut swarm = Swarm::new(3, Sphere { n: 3 }).with_seed(0);
        swarm
            .create_swarm(3, &VectorN::from_element(3, -1.0), &VectorN::from_element(3, 1.0), true)
            .unwrap();
        swarm.compute_next_step().unwrap();
        assert!(tracker.callback(1, &swarm).is_continue());
        assert!(tracker.traces.is_empty());
        assert_eq!(tracker.history[0].len(), 3);
    }

    #[test]
    fn test_write_pickle() {
        let tracker = TrackingObserver::build();
        let mut runner = runner(tracker.clone());
        runner.run(2).unwrap();
        let path = std::env::temp_dir().join("pso_engine_tracking_test.pkl");
        tracker.read().write_pickle(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        let _ = std::fs::remove_file(&path);
    }
}
