//! Error types for the cinema client

use reqwest::StatusCode;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure; the request never produced a response.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(
        "API endpoint not found: {url}. Make sure your backend API server is running at {backend_origin} and the endpoint exists."
    )]
    NotFound { url: String, backend_origin: String },

    #[error("Your session has expired ({reason}). Please log in again.")]
    SessionExpired { reason: String },

    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Refresh failed with status {0}")]
    RefreshFailed(StatusCode),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status behind this error, when the server produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::HttpRequest(e) => e.status(),
            ClientError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ClientError::SessionExpired { .. } => Some(StatusCode::UNAUTHORIZED),
            ClientError::Api { status, .. } | ClientError::RefreshFailed(status) => Some(*status),
            ClientError::Serialization(_) | ClientError::Configuration(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
