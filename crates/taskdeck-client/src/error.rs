//! Error types for the remote task and auth clients

use thiserror::Error;

/// Errors produced by the HTTP clients. Every failed operation maps to
/// exactly one of these; callers surface the message and leave their own
/// state untouched.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection or transport failure before a response was received
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status; message carries the response body when the
    /// server sent one
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Successful status but the body did not parse as the expected type
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A task operation was attempted with no credential; no request was
    /// issued
    #[error("not logged in")]
    MissingToken,
}

impl ApiError {
    /// Create a status error
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Check if this error means the credential was missing or rejected
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::Status { status: 401 | 403, .. }
        )
    }
}

/// Result type for client operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::status(500, "boom");
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert_eq!(err.to_string(), "server returned 500: boom");
    }

    #[test]
    fn test_auth_detection() {
        assert!(ApiError::MissingToken.is_auth());
        assert!(ApiError::status(401, "unauthorized").is_auth());
        assert!(ApiError::status(403, "forbidden").is_auth());
        assert!(!ApiError::status(500, "boom").is_auth());
    }
}
