//! Error types for the plano editor
//!
//! This module provides unified error handling across the editor: local
//! validation failures, missing entities, coordinate-mapping failures,
//! network failures reported by the sync layer, and configuration problems.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::DeviceId;

/// The main error type for the plano editor
#[derive(Debug, Error)]
pub enum EditorError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// General validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A connection whose endpoints are the same device
    #[error("Cannot connect device {0} to itself")]
    SelfConnection(DeviceId),

    /// Device type has no registered attribute model
    #[error("Unsupported device type: {0}")]
    UnsupportedDeviceType(String),

    /// Plano name that cannot be used as a diagram scope
    #[error("Invalid plano name '{name}': {message}")]
    InvalidPlanoName { name: String, message: String },

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    /// Device not present in the current diagram
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceId),

    /// Connection not present in the current diagram
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    // ========================================================================
    // Mapping Errors
    // ========================================================================
    /// No floor-plan surface is loaded, so there is nothing to map onto
    #[error("No diagram surface is loaded")]
    NoSurface,

    /// Surface transform cannot be inverted
    #[error("Surface transform is not invertible")]
    SingularTransform,

    /// Floor-plan markup could not be interpreted
    #[error("Invalid diagram surface: {0}")]
    InvalidSurface(String),

    // ========================================================================
    // Network Errors
    // ========================================================================
    /// Transport-level failure talking to the backend
    #[error("Network error during {operation}: {message}")]
    Network { operation: String, message: String },

    /// The backend answered but reported a failure
    #[error("Backend rejected {operation}: {message}")]
    Backend { operation: String, message: String },

    // ========================================================================
    // Serialization / IO Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// File IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File read error
    #[error("Failed to read file '{path}': {message}")]
    FileRead { path: PathBuf, message: String },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Operation cancelled by user
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl EditorError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        EditorError::Validation(msg.into())
    }

    /// Create a network error for the named operation
    pub fn network(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        EditorError::Network {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create a backend-rejection error for the named operation
    pub fn backend(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        EditorError::Backend {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        EditorError::Internal(msg.into())
    }

    /// Create an error with context
    pub fn with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        EditorError::WithContext {
            context: context.into(),
            message: msg.into(),
        }
    }

    /// Check if this error was raised by local validation (no request was sent)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EditorError::Validation(_)
                | EditorError::SelfConnection(_)
                | EditorError::UnsupportedDeviceType(_)
                | EditorError::InvalidPlanoName { .. }
        )
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EditorError::DeviceNotFound(_) | EditorError::ConnectionNotFound(_)
        )
    }

    /// Check if this error came from talking to the backend
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            EditorError::Network { .. } | EditorError::Backend { .. }
        )
    }

    /// Check if this is a coordinate-mapping failure (treated as a no-op)
    pub fn is_mapping(&self) -> bool {
        matches!(self, EditorError::NoSurface | EditorError::SingularTransform)
    }
}

/// Result type alias using EditorError
pub type EditorResult<T> = Result<T, EditorError>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> EditorResult<T>;
}

impl<T, E: Into<EditorError>> ResultExt<T> for Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> EditorResult<T> {
        self.map_err(|e| {
            let err: EditorError = e.into();
            EditorError::WithContext {
                context: context.into(),
                message: err.to_string(),
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validation_error() {
        let err = EditorError::validation("Name is required");
        assert!(err.is_validation());
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "Validation error: Name is required");
    }

    #[test]
    fn test_self_connection_is_validation() {
        let err = EditorError::SelfConnection(7);
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Cannot connect device 7 to itself");
    }

    #[test]
    fn test_network_errors() {
        let err = EditorError::network("list devices", "connection refused");
        assert!(err.is_network());
        assert_eq!(
            err.to_string(),
            "Network error during list devices: connection refused"
        );

        let err = EditorError::backend("create device", "Unsupported device type: router");
        assert!(err.is_network());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_mapping_errors() {
        assert!(EditorError::NoSurface.is_mapping());
        assert!(EditorError::SingularTransform.is_mapping());
        assert!(!EditorError::DeviceNotFound(1).is_mapping());
        assert!(EditorError::DeviceNotFound(1).is_not_found());
    }

    #[test]
    fn test_error_with_context() {
        let err = EditorError::with_context("Loading config", "Permission denied");
        assert_eq!(err.to_string(), "Loading config: Permission denied");

        let io: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = io.with_context("Reading plano-editor.toml").unwrap_err();
        assert_eq!(err.to_string(), "Reading plano-editor.toml: IO error: missing");
    }
}
