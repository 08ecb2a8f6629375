//! Error types for syncline operations.
//!
//! This module defines [`SynclineError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `SynclineError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `SynclineError::Other`) for unexpected errors
//! - Not-found is never an error at the store boundary; it means "no data yet"

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for syncline operations.
#[derive(Debug, Error)]
pub enum SynclineError {
    /// Network-level failure talking to a remote backend.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered, but with a non-success status.
    #[error("Backend request failed with status {status}: {url}")]
    BackendStatus { url: String, status: u16 },

    /// A stored document could not be decoded into the expected record.
    #[error("Malformed document {collection}/{id}: {message}")]
    MalformedDocument {
        collection: String,
        id: String,
        message: String,
    },

    /// A billing operation was rejected by the payment backend.
    #[error("Billing operation failed: {message}")]
    Billing { message: String },

    /// Configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for syncline operations.
pub type Result<T> = std::result::Result<T, SynclineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_status_displays_url_and_status() {
        let err = SynclineError::BackendStatus {
            url: "https://api.example.com/subscriptions/u1".into(),
            status: 503,
        };
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("subscriptions/u1"));
    }

    #[test]
    fn malformed_document_displays_location() {
        let err = SynclineError::MalformedDocument {
            collection: "userProgress".into(),
            id: "u1".into(),
            message: "missing field `currentStep`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("userProgress/u1"));
        assert!(msg.contains("currentStep"));
    }

    #[test]
    fn billing_displays_message() {
        let err = SynclineError::Billing {
            message: "unknown plan".into(),
        };
        assert!(err.to_string().contains("unknown plan"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = SynclineError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SynclineError = io_err.into();
        assert!(matches!(err, SynclineError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(SynclineError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
