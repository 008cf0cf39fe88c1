//! Error handling for the order flow trainer
//!
//! The simulation engine itself cannot fail: every tick is bounded arithmetic
//! over random draws. Errors only come from the outer surface (config files,
//! serialization of snapshots, the async driver task).

use std::fmt;
use std::io;

use crate::config::ConfigError;

/// Main error type for the trainer
#[derive(Debug)]
pub enum TrainerError {
    // Configuration errors
    ConfigParse(String),
    ConfigValidation(String),

    // IO errors
    FileRead(String),
    FileWrite(String),

    // Output errors
    Serialization(String),

    // Driver errors
    EngineStopped(String),

    // General errors
    Internal(String),
}

impl TrainerError {
    /// Get a user-friendly error message with helpful context
    pub fn user_message(&self) -> String {
        match self {
            TrainerError::ConfigParse(msg) => {
                format!(
                    "Configuration parse error: {}\n\n\
                    💡 Quick fix:\n\
                    1. Run: flow-trainer init --force\n\
                    2. Adjust trainer.toml if needed\n\
                    3. Try again",
                    msg
                )
            }
            TrainerError::ConfigValidation(msg) => {
                format!(
                    "Configuration validation error: {}\n\n\
                    💡 Check trainer.toml for:\n\
                    - Positive prices, tick size and intervals\n\
                    - Non-negative spread and step sizes\n\
                    - Non-zero volume ranges and capacities",
                    msg
                )
            }
            TrainerError::EngineStopped(msg) => {
                format!(
                    "Simulation driver stopped unexpectedly: {}\n\n\
                    💡 Restart the trainer; run with --verbose to see the last ticks",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TrainerError::ConfigParse(_)
            | TrainerError::ConfigValidation(_) => "config",

            TrainerError::FileRead(_) | TrainerError::FileWrite(_) => "io",

            TrainerError::Serialization(_) => "output",

            TrainerError::EngineStopped(_) => "engine",

            TrainerError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for TrainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainerError::ConfigParse(msg) => {
                write!(f, "Configuration parse error: {}", msg)
            }
            TrainerError::ConfigValidation(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
            TrainerError::FileRead(msg) => {
                write!(f, "File read error: {}", msg)
            }
            TrainerError::FileWrite(msg) => {
                write!(f, "File write error: {}", msg)
            }
            TrainerError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            TrainerError::EngineStopped(msg) => {
                write!(f, "Simulation driver stopped: {}", msg)
            }
            TrainerError::Internal(msg) => {
                write!(f, "Internal error: {}", msg)
            }
        }
    }
}

impl std::error::Error for TrainerError {}

// Conversion implementations for common error types

impl From<io::Error> for TrainerError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                TrainerError::FileRead(err.to_string())
            }
            _ => TrainerError::Internal(format!("IO error: {}", err)),
        }
    }
}

impl From<serde_json::Error> for TrainerError {
    fn from(err: serde_json::Error) -> Self {
        TrainerError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<tokio::task::JoinError> for TrainerError {
    fn from(err: tokio::task::JoinError) -> Self {
        TrainerError::EngineStopped(err.to_string())
    }
}

impl From<ConfigError> for TrainerError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::FileRead(msg) => TrainerError::FileRead(msg),
            ConfigError::FileWrite(msg) => TrainerError::FileWrite(msg),
            ConfigError::Parse(msg) => TrainerError::ConfigParse(msg),
            ConfigError::Serialize(msg) => TrainerError::Serialization(msg),
            ConfigError::Validation(msg) => TrainerError::ConfigValidation(msg),
        }
    }
}

/// Result type alias using TrainerError
pub type TrainerResult<T> = Result<T, TrainerError>;
