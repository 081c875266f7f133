//! Rigid body definition.

use crate::Vec3;

/// A rigid body hanging from a hinge joint.
#[derive(Debug, Clone)]
pub struct Body {
    /// Name of the body.
    pub name: String,
    /// Mass in kg.
    pub mass: f64,
    /// Distance from the hinge to the center of mass.
    pub com_offset: f64,
    /// Principal moments of inertia about the center of mass.
    pub diaginertia: Vec3,
    /// Surface friction coefficient. Carried as a model parameter; the hinge
    /// dynamics do not read it.
    pub friction: f64,
    /// Index of the joint connecting this body to the world.
    pub joint_idx: usize,
}

impl Body {
    /// Moment of inertia about the hinge axis (parallel axis theorem).
    pub fn pivot_inertia(&self) -> f64 {
        self.diaginertia.z + self.mass * self.com_offset * self.com_offset
    }

    /// Uniform rod of `mass` and `length` hinged at one end.
    pub fn rod(name: &str, mass: f64, length: f64) -> Self {
        let i = mass * length * length / 12.0;
        Self {
            name: name.to_string(),
            mass,
            com_offset: length / 2.0,
            diaginertia: Vec3::new(i, i, i),
            friction: 1.0,
            joint_idx: 0,
        }
    }
}
