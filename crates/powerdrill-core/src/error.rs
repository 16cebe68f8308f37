//! Core error types for powerdrill-core.
//!
//! "No number available" is not an error: the scheduler returns `None` and
//! the round ends normally. Everything here is either a precondition
//! violation by the caller or an ambient failure (config IO, entropy).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for powerdrill-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Round controller precondition violations
    #[error("Round error: {0}")]
    Round(#[from] RoundError),

    /// Answer choice generation errors
    #[error("Choice error: {0}")]
    Choice(#[from] ChoiceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The OS random source could not produce a seed
    #[error("Entropy unavailable: {0}")]
    Entropy(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Calls made against the round controller in the wrong phase or with
/// stale data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error("no round is running")]
    NotRunning,

    #[error("round has already ended")]
    AlreadyEnded,

    #[error("question for {number} is still awaiting an answer")]
    QuestionPending { number: u32 },

    #[error("no question is awaiting an answer")]
    NoActiveQuestion,

    #[error("answer submitted for {got} but the active question is {expected}")]
    StaleQuestion { expected: u32, got: u32 },

    #[error("{value} is not one of the offered choices")]
    UnknownOption { value: u64 },
}

/// Answer choice generation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("need {needed} distinct distractors but the domain only offers {available}")]
    PoolExhausted { needed: usize, available: usize },

    #[error("{number} is outside the domain 1..={max}")]
    OutOfDomain { number: u32, max: u32 },

    #[error("at least one choice is required")]
    NoChoices,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be resolved or created
    #[error("Config directory unavailable: {0}")]
    DirUnavailable(String),
}

impl From<getrandom::Error> for CoreError {
    fn from(err: getrandom::Error) -> Self {
        CoreError::Entropy(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
