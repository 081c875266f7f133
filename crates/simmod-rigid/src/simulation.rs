//! Live simulation: a model, its state and derived quantities.

use crate::{Model, State};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a live simulation.
///
/// Modifiers and environments hold clones of the same handle; all access is
/// single-threaded.
pub type SimHandle = Rc<RefCell<Simulation>>;

/// A model together with its mutable state.
///
/// Each body swings on its own hinge as a planar compound pendulum. Quantities
/// derived from model parameters are cached and only refreshed by
/// [`Simulation::update_derived`], so parameter changes take effect after the
/// owning modifier propagates them.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub model: Model,
    pub state: State,
    effective_inertia: Vec<f64>,
}

impl Simulation {
    /// Create a simulation at the model's default state.
    pub fn new(model: Model) -> Self {
        let state = model.default_state();
        let mut sim = Self {
            model,
            state,
            effective_inertia: Vec::new(),
        };
        sim.update_derived();
        sim
    }

    /// Wrap into a shared handle.
    pub fn into_handle(self) -> SimHandle {
        Rc::new(RefCell::new(self))
    }

    /// Recompute cached quantities from the current model parameters.
    pub fn update_derived(&mut self) {
        self.effective_inertia = self
            .model
            .bodies
            .iter()
            .map(|b| b.pivot_inertia() + self.model.joints[b.joint_idx].armature)
            .collect();
    }

    /// Cached inertia about the hinge of body `idx`, including armature.
    pub fn effective_inertia(&self, idx: usize) -> Option<f64> {
        self.effective_inertia.get(idx).copied()
    }

    /// Reset the state, keeping model parameters.
    pub fn reset(&mut self) {
        self.state = self.model.default_state();
    }

    /// Advance by one timestep with semi-implicit Euler.
    pub fn step(&mut self) {
        let dt = self.model.dt;
        let g = self.model.gravity;

        for (idx, body) in self.model.bodies.iter().enumerate() {
            let j = body.joint_idx;
            let joint = &self.model.joints[j];
            let q = self.state.q[j];
            let v = self.state.v[j];

            // Gravity torque about the hinge for a COM at l·(sin q, -cos q).
            let l = body.com_offset;
            let tau_gravity = body.mass * l * (g.x * q.cos() + g.y * q.sin());
            let tau = tau_gravity + joint.passive_torque(v) + self.state.ctrl[j];
            // A body without inertia about its hinge is held in place.
            let inertia = self.effective_inertia[idx];
            let qdd = if inertia > 0.0 { tau / inertia } else { 0.0 };

            let v_new = v + qdd * dt;
            self.state.v[j] = v_new;
            self.state.q[j] = q + v_new * dt;
        }
        self.state.time += dt;
    }

    /// Run the simulation for `n` steps.
    pub fn simulate(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Total mechanical energy (kinetic + gravitational potential).
    pub fn total_energy(&self) -> f64 {
        let g = self.model.gravity;
        self.model
            .bodies
            .iter()
            .enumerate()
            .map(|(idx, body)| {
                let j = body.joint_idx;
                let (q, v) = (self.state.q[j], self.state.v[j]);
                let l = body.com_offset;
                let kinetic = 0.5 * self.effective_inertia[idx] * v * v;
                let potential = -body.mass * (g.x * l * q.sin() - g.y * l * q.cos());
                kinetic + potential
            })
            .sum()
    }
}
