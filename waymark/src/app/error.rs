//! Application error types.

use std::fmt;

use crate::log::LogError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to set up file logging.
    Logging(LogError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Logging(e) => {
                write!(f, "Failed to set up logging: {}", e)
            }
            AppError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Logging(e) => Some(e),
            AppError::RuntimeCreation(_) => None,
        }
    }
}

impl From<LogError> for AppError {
    fn from(e: LogError) -> Self {
        AppError::Logging(e)
    }
}
