//! Core of simmod: domain randomization for physics simulators.
//!
//! Provides:
//! - [`Parametrization`]: one randomizable quantity (object, setter, bounds,
//!   distribution, execution point, history)
//! - [`SetterRegistry`] / [`Modifier`]: named setters bound to a simulation backend
//! - [`UniformDomainRandomization`]: samples every parametrization and pushes
//!   the values through the owning modifier
//! - JSON configuration schema for building a modifier's instrumentation

pub mod algorithm;
pub mod config;
pub mod distribution;
pub mod error;
pub mod execution;
pub mod modifier;
pub mod parametrization;

pub use algorithm::{Algorithm, RandomState, UniformDomainRandomization};
pub use config::{
    ObjectConfig, ParameterConfig, RandomizationConfig, RangeSpec, load_config, parse_config,
};
pub use distribution::Distribution;
pub use error::{Result, SimmodError};
pub use execution::Execution;
pub use modifier::{
    Kwargs, Modifier, Setter, SetterFn, SetterModifier, SetterRegistry, build_instrumentation,
};
pub use parametrization::{Parametrization, sample_to_json};

use nalgebra as na;

/// Dynamic vector of parameter values.
pub type DVec = na::DVector<f64>;

/// One sampled value: an array per positional setter argument.
pub type Sample = Vec<DVec>;
