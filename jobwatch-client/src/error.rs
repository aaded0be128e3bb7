//! Error types for the job-control client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the job-control API
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code other than 404
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// API answered 404 for the named job, client or listing
    #[error("Not found: {0}")]
    NotFound(String),
}

impl ClientError {
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Error for a non-success status; 404 names the missing resource
    pub(crate) fn from_status(status: u16, message: String, resource: String) -> Self {
        match status {
            404 => Self::NotFound(resource),
            _ => Self::api_error(status, message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The server refused a suspend/resume/kill because the job is past the point
    /// where that action applies (typically it already finished).
    pub fn is_job_not_modifiable(&self) -> bool {
        match self {
            Self::ApiError { message, .. } => message
                .to_lowercase()
                .contains("job cannot be suspended/killed/resumed"),
            _ => false,
        }
    }
}
