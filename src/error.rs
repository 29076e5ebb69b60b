//! Error types for background removal client operations

use thiserror::Error;

/// Result type alias for background removal client operations
pub type Result<T> = std::result::Result<T, CutoutError>;

/// Fixed user-facing message for any failed removal attempt.
///
/// The session surfaces this single string regardless of the underlying
/// cause (bad credential, network failure, server error, malformed
/// response). The structured cause is logged instead of shown.
pub const FAILURE_MESSAGE: &str =
    "Failed to process image. Please make sure you have a valid API key.";

/// Comprehensive error types for background removal client operations
#[derive(Error, Debug)]
pub enum CutoutError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image format or decoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Network-level errors (connection, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP response from the background removal service
    #[error("Service error (HTTP {status}): {message}")]
    Service {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body or status text for logging
        message: String,
    },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CutoutError {
    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a network error with operation context
    pub fn network_error<S: Into<String>, E: std::fmt::Display>(msg: S, error: E) -> Self {
        Self::Network(format!("{}: {}", msg.into(), error))
    }

    /// Create a service error from an HTTP status and response body
    pub fn service_error<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// The single message shown to the user for any failed attempt
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        FAILURE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = CutoutError::invalid_config("test config error");
        assert!(matches!(err, CutoutError::InvalidConfig(_)));

        let err = CutoutError::service_error(403, "forbidden");
        assert!(matches!(err, CutoutError::Service { status: 403, .. }));
    }

    #[test]
    fn test_error_display() {
        let err = CutoutError::invalid_config("missing API key");
        assert_eq!(err.to_string(), "Invalid configuration: missing API key");

        let err = CutoutError::service_error(500, "internal server error");
        assert_eq!(
            err.to_string(),
            "Service error (HTTP 500): internal server error"
        );
    }

    #[test]
    fn test_file_io_error_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = CutoutError::file_io_error("read image file", Path::new("/tmp/in.png"), &io_error);
        let error_string = err.to_string();
        assert!(error_string.contains("read image file"));
        assert!(error_string.contains("/tmp/in.png"));
    }

    #[test]
    fn test_user_message_is_uniform() {
        let errors = vec![
            CutoutError::network_error("request failed", "connection refused"),
            CutoutError::service_error(403, "forbidden"),
            CutoutError::internal("unexpected"),
        ];

        for err in errors {
            assert_eq!(err.user_message(), FAILURE_MESSAGE);
        }
    }
}
