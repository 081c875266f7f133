//! Simulation state — mutable per-timestep data.

use simmod_core::DVec;

/// Mutable simulation state.
#[derive(Debug, Clone)]
pub struct State {
    /// Joint angles, measured from hanging straight down.
    pub q: DVec,
    /// Joint velocities.
    pub v: DVec,
    /// Applied joint torques.
    pub ctrl: DVec,
    /// Simulation time.
    pub time: f64,
}

impl State {
    /// Create a zero-initialized state for `nq` joints.
    pub fn new(nq: usize) -> Self {
        Self {
            q: DVec::zeros(nq),
            v: DVec::zeros(nq),
            ctrl: DVec::zeros(nq),
            time: 0.0,
        }
    }
}
