//! Environment interface and randomizing wrapper.
//!
//! [`RandomizedEnv`] wraps any [`Environment`] and resamples the parameters of
//! an [`Algorithm`] on every reset. The sampled values and configured ranges
//! are exposed as metadata for training harnesses.

use serde_json::{Map, Value};
use simmod_core::{Algorithm, Execution, Result, sample_to_json};
use tracing::debug;

/// Metadata key of the configured `[lower, upper]` ranges.
pub const PARAMETER_RANGE_KEY: &str = "randomization.parameter_range";
/// Metadata key of the most recently applied values.
pub const PARAMETER_VALUE_KEY: &str = "randomization.parameter_value";

/// Result of advancing an environment by one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<O> {
    pub observation: O,
    pub reward: f64,
    pub done: bool,
    pub info: Map<String, Value>,
}

impl<O> Transition<O> {
    /// Transition without extra info.
    pub fn new(observation: O, reward: f64, done: bool) -> Self {
        Self {
            observation,
            reward,
            done,
            info: Map::new(),
        }
    }
}

/// Standard step/reset interface consumed by RL harnesses.
pub trait Environment {
    type Action;
    type Observation;

    /// Start a new episode.
    fn reset(&mut self) -> Result<Self::Observation>;

    /// Advance the episode by one action.
    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>>;
}

/// Environment wrapper applying a randomization algorithm.
///
/// `reset` resamples every parameter before delegating to the wrapped
/// environment. `step` delegates unchanged unless step randomization is
/// enabled, in which case parameters tagged `BEFORE_STEP` / `AFTER_STEP` are
/// resampled around the wrapped step.
pub struct RandomizedEnv<E, A> {
    env: E,
    alg: A,
    metadata: Map<String, Value>,
    randomize_before_step: bool,
    randomize_after_step: bool,
}

impl<E: Environment, A: Algorithm> RandomizedEnv<E, A> {
    /// Wrap `env`, randomizing it with `alg`.
    pub fn new(env: E, alg: A) -> Self {
        let mut wrapper = Self {
            env,
            alg,
            metadata: Map::new(),
            randomize_before_step: false,
            randomize_after_step: false,
        };
        wrapper.setup_metadata();
        wrapper
    }

    /// Enable resampling of `BEFORE_STEP` and/or `AFTER_STEP` parameters.
    pub fn with_step_randomization(mut self, before: bool, after: bool) -> Self {
        self.randomize_before_step = before;
        self.randomize_after_step = after;
        self
    }

    /// Metadata exposed to training harnesses.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// The wrapped environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Mutable access to the wrapped environment.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    /// The randomization algorithm.
    pub fn algorithm(&self) -> &A {
        &self.alg
    }

    /// Unwrap into the environment and the algorithm.
    pub fn into_inner(self) -> (E, A) {
        (self.env, self.alg)
    }

    fn setup_metadata(&mut self) {
        let mut ranges = Map::new();
        for modifier in self.alg.modifiers() {
            for param in modifier.instrumentation() {
                let (lower, upper) = param.parameter_range();
                let range = Value::Array(vec![
                    Value::from(lower.as_slice().to_vec()),
                    Value::from(upper.as_slice().to_vec()),
                ]);
                ranges.insert(param.key(), range);
            }
        }
        self.metadata
            .insert(PARAMETER_RANGE_KEY.to_string(), Value::Object(ranges));
    }

    fn update_metadata(&mut self) {
        let mut values = Map::new();
        for modifier in self.alg.modifiers() {
            for param in modifier.instrumentation() {
                values.insert(param.key(), sample_to_json(param.current_val()));
            }
        }
        self.metadata
            .insert(PARAMETER_VALUE_KEY.to_string(), Value::Object(values));
    }
}

impl<E: Environment, A: Algorithm> Environment for RandomizedEnv<E, A> {
    type Action = E::Action;
    type Observation = E::Observation;

    fn reset(&mut self) -> Result<Self::Observation> {
        self.alg.step(Execution::Reset)?;
        let observation = self.env.reset()?;
        self.update_metadata();
        debug!(
            parameters = self.metadata[PARAMETER_VALUE_KEY]
                .as_object()
                .map_or(0, |m| m.len()),
            "randomized environment reset"
        );
        Ok(observation)
    }

    fn step(&mut self, action: &Self::Action) -> Result<Transition<Self::Observation>> {
        if self.randomize_before_step {
            self.alg.step_matching(Execution::BeforeStep)?;
        }
        let transition = self.env.step(action)?;
        if self.randomize_after_step {
            self.alg.step_matching(Execution::AfterStep)?;
        }
        if self.randomize_before_step || self.randomize_after_step {
            self.update_metadata();
        }
        Ok(transition)
    }
}
