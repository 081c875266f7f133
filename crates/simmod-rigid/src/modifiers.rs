//! Modifiers for the rigid-body backend.
//!
//! Each modifier addresses one kind of object (joints, bodies or the global
//! options) of a shared [`SimHandle`]. Setters write model parameters directly;
//! [`SetterModifier::update`] refreshes the simulation's derived quantities so
//! the new values take effect.

use crate::{SimHandle, Vec3};
use simmod_core::{
    DVec, Kwargs, Parametrization, RandomizationConfig, Result, SetterModifier, SetterRegistry,
    SimmodError, build_instrumentation,
};
use std::sync::LazyLock;
use tracing::trace;

fn scalar(setter: &str, values: &[DVec]) -> Result<f64> {
    match values.first().map(|v| v.as_slice()) {
        Some([value]) => Ok(*value),
        Some(other) => Err(SimmodError::InvalidValue {
            setter: setter.to_string(),
            reason: format!("expected a scalar, got {} elements", other.len()),
        }),
        None => Err(SimmodError::InvalidValue {
            setter: setter.to_string(),
            reason: "missing value".to_string(),
        }),
    }
}

fn unknown_object<M: SetterModifier>(name: &str) -> SimmodError {
    SimmodError::UnknownObject {
        object: name.to_string(),
        modifier: M::NAME.to_string(),
    }
}

fn configured<M: SetterModifier>(config: Option<&RandomizationConfig>) -> Result<Vec<Parametrization>> {
    config.map_or_else(|| Ok(Vec::new()), build_instrumentation::<M>)
}

/// Reject parametrizations addressing objects the simulation does not have.
fn validated<M: SetterModifier>(modifier: M) -> Result<M> {
    let names = SetterModifier::names(&modifier);
    let unknown = SetterModifier::instrumentation(&modifier)
        .iter()
        .find(|p| !names.contains(&p.object_name))
        .map(|p| unknown_object::<M>(&p.object_name));
    match unknown {
        Some(err) => Err(err),
        None => Ok(modifier),
    }
}

/// Randomizes hinge joint parameters.
pub struct JointModifier {
    sim: SimHandle,
    instrumentation: Vec<Parametrization>,
}

impl JointModifier {
    /// Create a joint modifier, building its instrumentation from `config`.
    pub fn new(sim: SimHandle, config: Option<&RandomizationConfig>) -> Result<Self> {
        validated(Self {
            sim,
            instrumentation: configured::<Self>(config)?,
        })
    }

    fn joint_id(&self, name: &str) -> Result<usize> {
        self.sim
            .borrow()
            .model
            .joint_id(name)
            .ok_or_else(|| unknown_object::<Self>(name))
    }

    fn set_damping(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        let id = self.joint_id(name)?;
        self.sim.borrow_mut().model.joints[id].damping = scalar("damping", values)?;
        Ok(())
    }

    fn set_armature(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        let id = self.joint_id(name)?;
        self.sim.borrow_mut().model.joints[id].armature = scalar("armature", values)?;
        Ok(())
    }

    fn set_frictionloss(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        let id = self.joint_id(name)?;
        self.sim.borrow_mut().model.joints[id].frictionloss = scalar("frictionloss", values)?;
        Ok(())
    }
}

impl SetterModifier for JointModifier {
    const NAME: &'static str = "JointModifier";

    fn registry() -> &'static SetterRegistry<Self> {
        static REGISTRY: LazyLock<SetterRegistry<JointModifier>> = LazyLock::new(|| {
            SetterRegistry::new()
                .register("damping", 1, JointModifier::set_damping)
                .register("armature", 1, JointModifier::set_armature)
                .register("frictionloss", 1, JointModifier::set_frictionloss)
        });
        &REGISTRY
    }

    fn names(&self) -> Vec<String> {
        self.sim.borrow().model.joints.iter().map(|j| j.name.clone()).collect()
    }

    fn instrumentation(&self) -> &[Parametrization] {
        &self.instrumentation
    }

    fn instrumentation_mut(&mut self) -> &mut [Parametrization] {
        &mut self.instrumentation
    }

    fn update(&mut self) -> Result<()> {
        self.sim.borrow_mut().update_derived();
        trace!(modifier = Self::NAME, "derived quantities refreshed");
        Ok(())
    }
}

/// Randomizes rigid body parameters.
pub struct BodyModifier {
    sim: SimHandle,
    instrumentation: Vec<Parametrization>,
}

impl BodyModifier {
    /// Create a body modifier, building its instrumentation from `config`.
    pub fn new(sim: SimHandle, config: Option<&RandomizationConfig>) -> Result<Self> {
        validated(Self {
            sim,
            instrumentation: configured::<Self>(config)?,
        })
    }

    fn body_id(&self, name: &str) -> Result<usize> {
        self.sim
            .borrow()
            .model
            .body_id(name)
            .ok_or_else(|| unknown_object::<Self>(name))
    }

    fn set_mass(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        let id = self.body_id(name)?;
        self.sim.borrow_mut().model.bodies[id].mass = scalar("mass", values)?;
        Ok(())
    }

    fn set_friction(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        let id = self.body_id(name)?;
        self.sim.borrow_mut().model.bodies[id].friction = scalar("friction", values)?;
        Ok(())
    }

    fn set_diaginertia(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        let id = self.body_id(name)?;
        let value = &values[0];
        if value.len() != 3 {
            return Err(SimmodError::InvalidValue {
                setter: "diaginertia".to_string(),
                reason: format!("expected 3-dim value, got {} elements", value.len()),
            });
        }
        self.sim.borrow_mut().model.bodies[id].diaginertia = Vec3::new(value[0], value[1], value[2]);
        Ok(())
    }
}

impl SetterModifier for BodyModifier {
    const NAME: &'static str = "BodyModifier";

    fn registry() -> &'static SetterRegistry<Self> {
        static REGISTRY: LazyLock<SetterRegistry<BodyModifier>> = LazyLock::new(|| {
            SetterRegistry::new()
                .register("mass", 1, BodyModifier::set_mass)
                .register("friction", 1, BodyModifier::set_friction)
                .register("diaginertia", 1, BodyModifier::set_diaginertia)
        });
        &REGISTRY
    }

    fn names(&self) -> Vec<String> {
        self.sim.borrow().model.bodies.iter().map(|b| b.name.clone()).collect()
    }

    fn instrumentation(&self) -> &[Parametrization] {
        &self.instrumentation
    }

    fn instrumentation_mut(&mut self) -> &mut [Parametrization] {
        &mut self.instrumentation
    }

    fn update(&mut self) -> Result<()> {
        self.sim.borrow_mut().update_derived();
        trace!(modifier = Self::NAME, "derived quantities refreshed");
        Ok(())
    }
}

/// Randomizes global simulation options, addressed as the object `option`.
pub struct OptionModifier {
    sim: SimHandle,
    instrumentation: Vec<Parametrization>,
}

impl OptionModifier {
    /// Create an option modifier, building its instrumentation from `config`.
    pub fn new(sim: SimHandle, config: Option<&RandomizationConfig>) -> Result<Self> {
        validated(Self {
            sim,
            instrumentation: configured::<Self>(config)?,
        })
    }

    fn check_object(name: &str) -> Result<()> {
        if name == "option" {
            Ok(())
        } else {
            Err(unknown_object::<Self>(name))
        }
    }

    /// A single value sets the vertical (Y) component, three set the full vector.
    fn set_gravity(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        Self::check_object(name)?;
        let gravity = match values[0].as_slice() {
            [g] => Vec3::new(0.0, *g, 0.0),
            [x, y, z] => Vec3::new(*x, *y, *z),
            other => {
                return Err(SimmodError::InvalidValue {
                    setter: "gravity".to_string(),
                    reason: format!("expected 1 or 3 elements, got {}", other.len()),
                });
            }
        };
        self.sim.borrow_mut().model.gravity = gravity;
        Ok(())
    }

    fn set_timestep(&mut self, name: &str, values: &[DVec], _: &Kwargs) -> Result<()> {
        Self::check_object(name)?;
        let dt = scalar("timestep", values)?;
        if dt <= 0.0 {
            return Err(SimmodError::InvalidValue {
                setter: "timestep".to_string(),
                reason: format!("timestep must be positive, got {dt}"),
            });
        }
        self.sim.borrow_mut().model.dt = dt;
        Ok(())
    }
}

impl SetterModifier for OptionModifier {
    const NAME: &'static str = "OptionModifier";

    fn registry() -> &'static SetterRegistry<Self> {
        static REGISTRY: LazyLock<SetterRegistry<OptionModifier>> = LazyLock::new(|| {
            SetterRegistry::new()
                .register("gravity", 1, OptionModifier::set_gravity)
                .register("timestep", 1, OptionModifier::set_timestep)
        });
        &REGISTRY
    }

    fn names(&self) -> Vec<String> {
        vec!["option".to_string()]
    }

    fn instrumentation(&self) -> &[Parametrization] {
        &self.instrumentation
    }

    fn instrumentation_mut(&mut self) -> &mut [Parametrization] {
        &mut self.instrumentation
    }

    fn update(&mut self) -> Result<()> {
        Ok(())
    }
}
