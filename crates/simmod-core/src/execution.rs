//! Execution points in an episode lifecycle.

use crate::error::{Result, SimmodError};
use std::fmt;
use std::str::FromStr;

/// Moment at which a parameter is intended to be resampled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Execution {
    /// Before the simulation advances by one step.
    BeforeStep,
    /// After the simulation advanced by one step.
    AfterStep,
    /// When the episode is reset.
    #[default]
    Reset,
}

impl Execution {
    /// All execution points in lifecycle order.
    pub const ALL: [Execution; 3] = [Execution::BeforeStep, Execution::AfterStep, Execution::Reset];

    /// Configuration name of this execution point.
    pub fn as_str(&self) -> &'static str {
        match self {
            Execution::BeforeStep => "BEFORE_STEP",
            Execution::AfterStep => "AFTER_STEP",
            Execution::Reset => "RESET",
        }
    }
}

impl FromStr for Execution {
    type Err = SimmodError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "BEFORE_STEP" => Ok(Execution::BeforeStep),
            "AFTER_STEP" => Ok(Execution::AfterStep),
            "RESET" => Ok(Execution::Reset),
            other => Err(SimmodError::InvalidExecution(other.to_string())),
        }
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for execution in Execution::ALL {
            let parsed: Execution = execution.as_str().parse().unwrap();
            assert_eq!(parsed, execution);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "reset".parse::<Execution>().unwrap_err();
        assert!(matches!(err, SimmodError::InvalidExecution(ref name) if name == "reset"));
    }

    #[test]
    fn test_default_is_reset() {
        assert_eq!(Execution::default(), Execution::Reset);
    }
}
