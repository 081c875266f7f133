//! Hinge joint definition.

/// A hinge joint rotating about the world Z axis.
#[derive(Debug, Clone)]
pub struct Joint {
    /// Name of the joint.
    pub name: String,
    /// Viscous damping coefficient.
    pub damping: f64,
    /// Rotor inertia added to the hinge.
    pub armature: f64,
    /// Dry friction torque opposing motion.
    pub frictionloss: f64,
}

impl Joint {
    /// Create an undamped hinge.
    pub fn hinge(name: &str) -> Self {
        Self {
            name: name.to_string(),
            damping: 0.0,
            armature: 0.0,
            frictionloss: 0.0,
        }
    }

    /// Torque from damping and dry friction at velocity `v`.
    pub fn passive_torque(&self, v: f64) -> f64 {
        let friction = if v == 0.0 { 0.0 } else { self.frictionloss * v.signum() };
        -self.damping * v - friction
    }
}
