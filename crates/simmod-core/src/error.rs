//! Error types for simmod.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimmodError {
    #[error("Invalid execution point '{0}', expected one of BEFORE_STEP, AFTER_STEP, RESET")]
    InvalidExecution(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Distribution type '{0}' not available, use 'uniform', 'loguniform' or 'normal'")]
    UnsupportedDistribution(String),

    #[error("Invalid parameters for distribution '{distribution}': {reason}")]
    InvalidDistributionParameters {
        distribution: String,
        reason: String,
    },

    #[error("Setter '{setter}' is not registered on {modifier}")]
    UnknownSetter { setter: String, modifier: String },

    #[error("Object '{object}' not found by {modifier}")]
    UnknownObject { object: String, modifier: String },

    #[error("Invalid value for setter '{setter}': {reason}")]
    InvalidValue { setter: String, reason: String },

    #[error("Invalid random state: {0}")]
    InvalidRandomState(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimmodError>;
