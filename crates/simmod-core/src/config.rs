//! Randomization configuration schema and JSON loader.
//!
//! A configuration maps object names to setter names to a [`ParameterConfig`]:
//!
//! ```json
//! {
//!   "pole": {
//!     "mass": { "range": [0.01, 0.1], "distribution": "uniform", "execution": "RESET" }
//!   },
//!   "arm": {
//!     "diaginertia": { "range": [[1e-5, 2e-5], [1e-5, 2e-5], [1e-7, 1e-6]] }
//!   }
//! }
//! ```
//!
//! Document order is preserved, which fixes the order in which parameters are
//! sampled.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw sampling range as written in a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeSpec {
    /// A single `[low, high]` pair.
    Flat(Vec<f64>),
    /// One `[low, high]` pair per dimension.
    Nested(Vec<Vec<f64>>),
}

impl RangeSpec {
    /// Single `[low, high]` pair.
    pub fn pair(low: f64, high: f64) -> Self {
        RangeSpec::Flat(vec![low, high])
    }

    /// Per-dimension pairs.
    pub fn pairs(pairs: &[[f64; 2]]) -> Self {
        RangeSpec::Nested(pairs.iter().map(|p| p.to_vec()).collect())
    }
}

impl From<[f64; 2]> for RangeSpec {
    fn from(pair: [f64; 2]) -> Self {
        RangeSpec::pair(pair[0], pair[1])
    }
}

/// Configuration of a single randomized parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterConfig {
    /// Sampling bounds (or mean/std for normal sampling).
    pub range: RangeSpec,
    /// Distribution name: `uniform`, `normal`/`gaussian` or `loguniform`.
    #[serde(default = "default_distribution")]
    pub distribution: String,
    /// Execution point name.
    #[serde(default = "default_execution")]
    pub execution: String,
    /// Optional target shape; the last dimension must be 2.
    #[serde(default)]
    pub shape: Option<Vec<usize>>,
    /// Optional human-readable label.
    #[serde(default)]
    pub name: Option<String>,
}

impl ParameterConfig {
    /// Uniform parameter resampled on reset.
    pub fn new(range: impl Into<RangeSpec>) -> Self {
        Self {
            range: range.into(),
            distribution: default_distribution(),
            execution: default_execution(),
            shape: None,
            name: None,
        }
    }

    /// Set the distribution name.
    pub fn distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = distribution.into();
        self
    }

    /// Set the execution point name.
    pub fn execution(mut self, execution: impl Into<String>) -> Self {
        self.execution = execution.into();
        self
    }

    /// Set the target shape.
    pub fn shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = Some(shape);
        self
    }
}

fn default_distribution() -> String {
    "uniform".to_string()
}

fn default_execution() -> String {
    "RESET".to_string()
}

/// Setter name → parameter configuration for one object.
pub type ObjectConfig = IndexMap<String, ParameterConfig>;

/// Object name → setters, for one modifier.
pub type RandomizationConfig = IndexMap<String, ObjectConfig>;

/// Parse a randomization configuration from a JSON string.
pub fn parse_config(json: &str) -> Result<RandomizationConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Load a randomization configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<RandomizationConfig> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}
