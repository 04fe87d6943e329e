//! Typed errors for the dashboard API client.

use thiserror::Error;

/// Errors returned by [`DashboardClient`](crate::DashboardClient) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status code.
    ///
    /// `message` carries the backend's `detail` field when the error body
    /// has one, otherwise the raw body text.
    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Client configuration problem (missing base URL, bad env).
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for dashboard API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
