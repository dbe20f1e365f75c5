//! Error types for the tutor API client

use thiserror::Error;

/// Errors that can occur when talking to the tutor backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Response body was not the JSON we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configured base URL cannot be used to build request URLs
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Check if the backend reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Short message suitable for an inline status line
    pub fn summary(&self) -> String {
        match self {
            ApiError::Request(e) if e.is_connect() => "Cannot reach the tutor server".to_string(),
            ApiError::Request(_) => "Network error".to_string(),
            ApiError::Status { status, .. } => format!("Server returned {}", status),
            ApiError::Json(_) => "Unexpected response from server".to_string(),
            ApiError::InvalidBaseUrl(url) => format!("Invalid API URL: {}", url),
        }
    }
}
