//! Error types for backend synchronisation

use plano_core::EditorError;
use thiserror::Error;

/// Errors that can occur when talking to the inventory backend
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned an error status (4xx or 5xx)
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The server answered 2xx but the body carried `{"error": ...}`
    #[error("Backend error: {0}")]
    Backend(String),

    /// Failed to deserialise the response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl SyncError {
    /// Whether this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }

    /// Whether the backend itself rejected the request (as opposed to transport failure)
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Api { status: 400..=499, .. })
    }

    /// Get the user-facing error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Request(e) => {
                if e.is_timeout() {
                    "Request timed out. Please try again.".to_string()
                } else if e.is_connect() {
                    "Unable to connect to the server. Please check your connection.".to_string()
                } else {
                    "An unexpected network error occurred.".to_string()
                }
            }
            Self::Api { message, .. } => message.clone(),
            Self::Backend(message) => message.clone(),
            Self::Parse(_) => "Received an unexpected response from the server.".to_string(),
            Self::NotFound(what) => format!("{} was not found on the server.", what),
        }
    }

    /// Convert into an editor error attributed to the named operation
    pub fn into_editor_error(self, operation: impl Into<String>) -> EditorError {
        match self {
            Self::Backend(_) | Self::Api { .. } => {
                EditorError::backend(operation, self.user_message())
            }
            other => EditorError::network(operation, other.to_string()),
        }
    }
}

impl From<SyncError> for EditorError {
    fn from(err: SyncError) -> Self {
        err.into_editor_error("backend request")
    }
}

/// Result type alias using SyncError
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(SyncError::NotFound("plano".into()).is_not_found());
        assert!(SyncError::Api { status: 404, message: String::new() }.is_not_found());
        assert!(SyncError::Backend("boom".into()).is_rejection());
        assert!(SyncError::Api { status: 422, message: String::new() }.is_rejection());
        assert!(!SyncError::Api { status: 503, message: String::new() }.is_rejection());
        assert!(!SyncError::Parse("eof".into()).is_rejection());
    }

    #[test]
    fn test_into_editor_error() {
        let err: EditorError = SyncError::Backend("Unsupported device type: nas".into())
            .into_editor_error("create device");
        assert!(err.is_network());
        assert_eq!(
            err.to_string(),
            "Backend rejected create device: Unsupported device type: nas"
        );

        let err: EditorError = SyncError::Parse("expected value".into()).into();
        assert!(matches!(err, EditorError::Network { .. }));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            SyncError::NotFound("Floor plan 'x'".into()).user_message(),
            "Floor plan 'x' was not found on the server."
        );
        assert_eq!(
            SyncError::Api { status: 500, message: "db locked".into() }.user_message(),
            "db locked"
        );
    }
}
