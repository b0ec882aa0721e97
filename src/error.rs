//! Error types and handling for Hestia
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Hestia operations
pub type Result<T> = std::result::Result<T, HestiaError>;

/// Main error type for Hestia
#[derive(Debug, Error)]
pub enum HestiaError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl HestiaError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        HestiaError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        HestiaError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        HestiaError::Io {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        HestiaError::Generic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for HestiaError {
    fn from(err: std::io::Error) -> Self {
        HestiaError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for HestiaError {
    fn from(err: serde_yaml::Error) -> Self {
        HestiaError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HestiaError {
    fn from(err: serde_json::Error) -> Self {
        HestiaError::Serialization {
            message: err.to_string(),
        }
    }
}
