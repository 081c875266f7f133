//! Episodic pendulum environment over a shared simulation.

use crate::SimHandle;
use simmod_core::{Result, SimmodError};
use simmod_env::{Environment, Transition};

/// Swing-down task: keep every joint near its rest angle.
///
/// Actions are joint torques, observations are `[q..., v...]` and the reward
/// is `-Σq²`. Episodes end after `max_steps` steps.
pub struct PendulumEnv {
    sim: SimHandle,
    initial_angle: f64,
    max_steps: usize,
    steps: usize,
}

impl PendulumEnv {
    pub fn new(sim: SimHandle, max_steps: usize) -> Self {
        Self {
            sim,
            initial_angle: 0.0,
            max_steps,
            steps: 0,
        }
    }

    /// Angle every joint starts from on reset.
    pub fn with_initial_angle(mut self, angle: f64) -> Self {
        self.initial_angle = angle;
        self
    }

    /// The shared simulation handle.
    pub fn sim(&self) -> &SimHandle {
        &self.sim
    }

    fn observe(&self) -> Vec<f64> {
        let sim = self.sim.borrow();
        sim.state.q.iter().chain(sim.state.v.iter()).copied().collect()
    }
}

impl Environment for PendulumEnv {
    type Action = Vec<f64>;
    type Observation = Vec<f64>;

    fn reset(&mut self) -> Result<Vec<f64>> {
        {
            let mut sim = self.sim.borrow_mut();
            sim.reset();
            sim.state.q.fill(self.initial_angle);
        }
        self.steps = 0;
        Ok(self.observe())
    }

    fn step(&mut self, action: &Vec<f64>) -> Result<Transition<Vec<f64>>> {
        let reward = {
            let mut sim = self.sim.borrow_mut();
            let nu = sim.state.ctrl.len();
            if action.len() != nu {
                return Err(SimmodError::Environment(format!(
                    "expected {nu} torques, got {}",
                    action.len()
                )));
            }
            sim.state.ctrl.copy_from_slice(action);
            sim.step();
            -sim.state.q.norm_squared()
        };
        self.steps += 1;
        Ok(Transition::new(self.observe(), reward, self.steps >= self.max_steps))
    }
}
