//! Configuration errors
//!
//! The simulation itself has no failure modes; only loading tuning, stage
//! data and settings can fail.

use thiserror::Error;

/// Error raised while parsing or validating configuration data
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Well-formed but out-of-range value
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },

    /// Stage data with an obstacle that cannot be simulated
    #[error("stage {stage}, obstacle {obstacle}: {reason}")]
    InvalidObstacle {
        stage: usize,
        obstacle: usize,
        reason: &'static str,
    },

    /// A stage registry must contain at least one stage
    #[error("stage registry is empty")]
    EmptyStages,
}
