//! Error types for the Platform API client
//!
//! Every non-2xx response is normalized to one message: the body's `error`
//! field, else its `message` field, else `HTTP {status}`. The variant records
//! which class of status produced it.

use thiserror::Error;

/// Errors that can occur when interacting with the Luncurkan Platform API
#[derive(Debug, Error)]
pub enum PlatformApiError {
    /// HTTP request failed before a response arrived (DNS, connect, TLS, timeout)
    #[error("{0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse a successful response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// 401
    #[error("{0}")]
    Unauthorized(String),

    /// 403
    #[error("{0}")]
    PermissionDenied(String),

    /// 404
    #[error("{0}")]
    NotFound(String),

    /// 429
    #[error("{0}")]
    RateLimited(String),

    /// 5xx
    #[error("{message}")]
    ServerError {
        /// HTTP status code (5xx)
        status: u16,
        /// Normalized error message
        message: String,
    },

    /// Any other non-success status
    #[error("{message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Normalized error message
        message: String,
    },
}

impl PlatformApiError {
    /// Classify a non-success status with its normalized message
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => PlatformApiError::Unauthorized(message),
            403 => PlatformApiError::PermissionDenied(message),
            404 => PlatformApiError::NotFound(message),
            429 => PlatformApiError::RateLimited(message),
            500..=599 => PlatformApiError::ServerError { status, message },
            _ => PlatformApiError::ApiError { status, message },
        }
    }

    /// HTTP status that produced this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            PlatformApiError::Unauthorized(_) => Some(401),
            PlatformApiError::PermissionDenied(_) => Some(403),
            PlatformApiError::NotFound(_) => Some(404),
            PlatformApiError::RateLimited(_) => Some(429),
            PlatformApiError::ServerError { status, .. }
            | PlatformApiError::ApiError { status, .. } => Some(*status),
            PlatformApiError::HttpError(e) => e.status().map(|s| s.as_u16()),
            PlatformApiError::ParseError(_) => None,
        }
    }
}

/// Result type alias for Platform API operations
pub type Result<T> = std::result::Result<T, PlatformApiError>;
