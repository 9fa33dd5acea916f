//! Error types for the Logsift clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to GitHub or the analysis service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Successful response without a body
    #[error("Received empty content from {0}")]
    EmptyContent(String),

    /// A header value could not be built from configuration
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is an authentication or permission failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::ApiError { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ClientError::api_error(404, "Not Found").is_not_found());
        assert!(ClientError::api_error(401, "Bad credentials").is_auth_error());
        assert!(ClientError::api_error(403, "Forbidden").is_auth_error());
        assert!(!ClientError::api_error(502, "Bad Gateway").is_auth_error());
        assert!(!ClientError::EmptyContent("x".into()).is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::api_error(410, "Gone");
        assert_eq!(err.to_string(), "API error (status 410): Gone");
    }
}
