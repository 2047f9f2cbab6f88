//! Error types of the validation, steering and configuration loading.

use thiserror::Error;

/// Errors of collision pair management.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The obstacle was never paired with the geometry of the joint body.
    #[error("obstacle \"{obstacle}\" is not registered as obstacle for joint \"{joint}\"")]
    NotRegistered {
        /// Name of the obstacle.
        obstacle: String,
        /// Name of the joint.
        joint: String,
    },
}

/// Errors of the spline steering method. Only malformed inputs produce them.
#[derive(Debug, Error)]
pub enum SteeringError {
    #[error("invalid size of {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The linear system of boundary constraints could not be solved.
    #[error("failed to solve spline constraints: {0}")]
    Solve(String),
}

/// Unified error to report failures while reading the planner configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse Error: {0}")]
    Parse(String),

    #[error("Invalid value of '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}
