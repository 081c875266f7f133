//! Randomization algorithms.
//!
//! An algorithm owns an ordered list of modifiers. On every `step` it resamples
//! the parametrizations of each modifier, pushes the new values through the
//! modifier's setters and finally calls [`Modifier::update`] once per modifier.

use crate::distribution::Distribution;
use crate::error::{Result, SimmodError};
use crate::execution::Execution;
use crate::modifier::{Kwargs, Modifier};
use crate::Sample;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace};

/// Source of the random generator owned by an algorithm.
#[derive(Debug, Clone, Default)]
pub enum RandomState {
    /// Generator seeded from OS entropy at construction.
    #[default]
    Entropy,
    /// Deterministic generator seeded with the given value.
    Seed(u64),
    /// Caller-supplied generator.
    Rng(StdRng),
}

impl RandomState {
    /// Build the generator.
    pub fn into_rng(self) -> StdRng {
        match self {
            RandomState::Entropy => StdRng::from_entropy(),
            RandomState::Seed(seed) => StdRng::seed_from_u64(seed),
            RandomState::Rng(rng) => rng,
        }
    }
}

impl From<u64> for RandomState {
    fn from(seed: u64) -> Self {
        RandomState::Seed(seed)
    }
}

impl From<StdRng> for RandomState {
    fn from(rng: StdRng) -> Self {
        RandomState::Rng(rng)
    }
}

impl From<Option<u64>> for RandomState {
    fn from(seed: Option<u64>) -> Self {
        seed.map_or(RandomState::Entropy, RandomState::Seed)
    }
}

impl TryFrom<i64> for RandomState {
    type Error = SimmodError;

    fn try_from(seed: i64) -> Result<Self> {
        u64::try_from(seed)
            .map(RandomState::Seed)
            .map_err(|_| SimmodError::InvalidRandomState(format!("seed must be non-negative, got {seed}")))
    }
}

/// Common interface of randomization algorithms.
pub trait Algorithm {
    /// Modifiers driven by this algorithm, in iteration order.
    fn modifiers(&self) -> &[Box<dyn Modifier>];

    /// Resample and apply every parametrization.
    fn step(&mut self, execution: Execution) -> Result<()> {
        self.step_with(execution, &Kwargs::new())
    }

    /// Like [`Algorithm::step`], forwarding `kwargs` to every setter.
    fn step_with(&mut self, execution: Execution, kwargs: &Kwargs) -> Result<()>;

    /// Resample only the parametrizations registered for `execution`.
    fn step_matching(&mut self, execution: Execution) -> Result<()>;

    /// Current value of parametrization `param` of modifier `modifier`.
    fn current_value(&self, modifier: usize, param: usize) -> Option<&Sample> {
        self.modifiers()
            .get(modifier)?
            .instrumentation()
            .get(param)?
            .current_val()
    }
}

/// Uniform Domain Randomization.
///
/// Samples every parameter independently from its configured distribution.
/// The `execution` argument of [`Algorithm::step`] is not used to filter
/// parametrizations; callers invoke `step` at the moment they want the
/// resampling to happen. Use [`Algorithm::step_matching`] to resample only the
/// parametrizations tagged with a given execution point.
pub struct UniformDomainRandomization {
    modifiers: Vec<Box<dyn Modifier>>,
    rng: StdRng,
}

impl UniformDomainRandomization {
    /// Create the algorithm over `modifiers` with the given random state.
    pub fn new(modifiers: Vec<Box<dyn Modifier>>, random_state: impl Into<RandomState>) -> Self {
        let random_state = random_state.into();
        info!(
            modifiers = modifiers.len(),
            parameters = modifiers.iter().map(|m| m.instrumentation().len()).sum::<usize>(),
            ?random_state,
            "uniform domain randomization created"
        );
        Self {
            modifiers,
            rng: random_state.into_rng(),
        }
    }

    /// Create the algorithm with a generator seeded from OS entropy.
    pub fn from_entropy(modifiers: Vec<Box<dyn Modifier>>) -> Self {
        Self::new(modifiers, RandomState::Entropy)
    }

    /// Randomize parametrization `idx` of `modifier`.
    ///
    /// Draws `arity` arrays (one per positional setter argument), records them
    /// in the parametrization and calls the setter.
    fn randomize_object(
        rng: &mut StdRng,
        modifier: &mut dyn Modifier,
        idx: usize,
        kwargs: &Kwargs,
    ) -> Result<()> {
        let param = &modifier.instrumentation()[idx];
        let distribution: Distribution = param.distribution.parse()?;
        let n_params = modifier.setter_arity(&param.setter)?;

        let (lower, upper) = param.parameter_range();
        let mut new_values: Sample = Vec::with_capacity(n_params);
        for _ in 0..n_params {
            new_values.push(distribution.sample(rng, lower, upper)?);
        }

        let setter = param.setter.clone();
        let object_name = param.object_name.clone();
        trace!(
            modifier = modifier.type_name(),
            %setter,
            object = %object_name,
            %distribution,
            values = ?new_values,
            "parameter sampled"
        );

        modifier.instrumentation_mut()[idx].update(new_values.clone());
        modifier.call_setter(&setter, &object_name, &new_values, kwargs)
    }

    fn run(&mut self, filter: Option<Execution>, kwargs: &Kwargs) -> Result<()> {
        for modifier in &mut self.modifiers {
            let selected: Vec<usize> = modifier
                .instrumentation()
                .iter()
                .enumerate()
                .filter(|(_, p)| filter.is_none_or(|e| p.execution == e))
                .map(|(i, _)| i)
                .collect();

            if filter.is_some() && selected.is_empty() {
                continue;
            }

            for &idx in &selected {
                Self::randomize_object(&mut self.rng, modifier.as_mut(), idx, kwargs)?;
            }
            modifier.update()?;
            debug!(
                modifier = modifier.type_name(),
                parameters = selected.len(),
                "modifier updated"
            );
        }
        Ok(())
    }
}

impl Algorithm for UniformDomainRandomization {
    fn modifiers(&self) -> &[Box<dyn Modifier>] {
        &self.modifiers
    }

    fn step_with(&mut self, execution: Execution, kwargs: &Kwargs) -> Result<()> {
        debug!(%execution, "randomization step");
        self.run(None, kwargs)
    }

    fn step_matching(&mut self, execution: Execution) -> Result<()> {
        debug!(%execution, "filtered randomization step");
        self.run(Some(execution), &Kwargs::new())
    }
}
