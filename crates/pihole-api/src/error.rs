//! API Error Types

use thiserror::Error;

/// Errors from the session exchange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Non-2xx answer from the auth endpoint
    #[error("Login failed HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// 2xx answer without a session id
    #[error("No SID in login response JSON")]
    MissingToken,

    /// Connection, timeout or body read failure
    #[error("Login transport error: {0}")]
    Transport(String),
}

/// Errors while retrieving statistics
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-2xx answer from the stats endpoint
    #[error("Stats failed HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx answer whose body is not a JSON object
    #[error("Stats body not parseable (HTTP {status}): {body}")]
    Malformed { status: u16, body: String },

    /// Connection, timeout or body read failure
    #[error("Stats transport error: {0}")]
    Transport(String),
}

/// Truncate a response body for diagnostics
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(crate::BODY_EXCERPT_CHARS).collect()
}
