//! Model definition — static description of a physical system.

use crate::{Body, Joint, State, Vec3};

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Static model describing the bodies, joints and global options.
#[derive(Debug, Clone)]
pub struct Model {
    /// Bodies, each hanging from its own joint.
    pub bodies: Vec<Body>,
    /// Joints connecting bodies to the world.
    pub joints: Vec<Joint>,
    /// Gravity vector in world frame.
    pub gravity: Vec3,
    /// Integration timestep.
    pub dt: f64,
}

impl Model {
    /// Create a default empty state for this model.
    pub fn default_state(&self) -> State {
        State::new(self.joints.len())
    }

    /// Index of the body called `name`.
    pub fn body_id(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.name == name)
    }

    /// Index of the joint called `name`.
    pub fn joint_id(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }
}

/// Builder for constructing models.
pub struct ModelBuilder {
    bodies: Vec<Body>,
    joints: Vec<Joint>,
    gravity: Vec3,
    dt: f64,
}

impl ModelBuilder {
    /// Start building a new model.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            joints: Vec::new(),
            gravity: Vec3::new(0.0, -GRAVITY, 0.0),
            dt: 0.001,
        }
    }

    /// Set the gravity vector.
    pub fn gravity(mut self, g: Vec3) -> Self {
        self.gravity = g;
        self
    }

    /// Set the timestep.
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Add a body hanging from `joint`.
    pub fn add_body(mut self, mut body: Body, joint: Joint) -> Self {
        body.joint_idx = self.joints.len();
        self.joints.push(joint);
        self.bodies.push(body);
        self
    }

    /// Add a uniform rod hanging from an undamped hinge.
    pub fn add_rod(self, body: &str, joint: &str, mass: f64, length: f64) -> Self {
        self.add_body(Body::rod(body, mass, length), Joint::hinge(joint))
    }

    /// Build the model.
    pub fn build(self) -> Model {
        Model {
            bodies: self.bodies,
            joints: self.joints,
            gravity: self.gravity,
            dt: self.dt,
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
