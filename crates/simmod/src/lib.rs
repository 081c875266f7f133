//! simmod — domain randomization for physics simulators.
//!
//! Umbrella crate re-exporting the core randomization machinery, the
//! environment wrapper and the rigid-body reference backend.
//!
//! ```ignore
//! let sim = Simulation::new(model).into_handle();
//! let config = load_config("pendulum.json")?;
//! let bodies = BodyModifier::new(sim.clone(), Some(&config))?;
//! let alg = UniformDomainRandomization::new(vec![Box::new(bodies)], 42u64);
//! let mut env = RandomizedEnv::new(PendulumEnv::new(sim, 200), alg);
//! let observation = env.reset()?;
//! ```

pub use simmod_core::{
    self, Algorithm, DVec, Distribution, Execution, Kwargs, Modifier, Parametrization,
    ParameterConfig, RandomState, RandomizationConfig, RangeSpec, Result, Sample, SetterModifier,
    SetterRegistry, SimmodError, UniformDomainRandomization, load_config, parse_config,
};
pub use simmod_env::{
    self, Environment, PARAMETER_RANGE_KEY, PARAMETER_VALUE_KEY, RandomizedEnv, Transition,
};
pub use simmod_rigid::{
    self, BodyModifier, JointModifier, Model, ModelBuilder, OptionModifier, PendulumEnv,
    SimHandle, Simulation, Vec3,
};
