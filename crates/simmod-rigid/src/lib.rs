//! Rigid-body reference backend for simmod.
//!
//! `Model` is the static description of a system of hinged bodies, `State` the
//! mutable joint state. A [`Simulation`] pairs the two behind a shared
//! [`SimHandle`] that the modifiers in [`modifiers`] randomize.

pub mod body;
pub mod env;
pub mod joint;
pub mod model;
pub mod modifiers;
pub mod simulation;
pub mod state;

/// 3D vector.
pub type Vec3 = nalgebra::Vector3<f64>;

pub use body::Body;
pub use env::PendulumEnv;
pub use joint::Joint;
pub use model::{GRAVITY, Model, ModelBuilder};
pub use modifiers::{BodyModifier, JointModifier, OptionModifier};
pub use simulation::{SimHandle, Simulation};
pub use state::State;
