//! Management API client error types.
//!
//! Errors carry an HTTP-level classification so callers can decide whether a
//! failure is benign (a 404 while removing a child), retryable (429, 5xx,
//! transport) or fatal.

use std::time::Duration;
use thiserror::Error;

pub type ManagementResult<T> = Result<T, ManagementError>;

/// Error returned by the Management API client.
#[derive(Debug, Error)]
pub enum ManagementError {
    /// The addressed object does not exist (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The request conflicts with existing state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The tenant rate limit was hit (429).
    #[error("rate limited (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Authentication against the tenant failed.
    #[error("authentication failed: {0}")]
    AuthError(String),

    /// Any other non-success HTTP status.
    #[error("management API error (status {status}): {detail}")]
    Api { status: u16, detail: String },

    /// The request did not complete in time. `timeout` is the client's
    /// configured limit when known.
    #[error("request timed out{}", timeout_suffix(.timeout))]
    Timeout { timeout: Option<Duration> },

    /// The tenant could not be reached.
    #[error("tenant unreachable: {0}")]
    Unreachable(String),

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body could not be decoded.
    #[error("failed to parse response: {0}")]
    ParseError(String),

    /// The client was configured with invalid settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A paginated collection exceeded the number of items a listing may
    /// collect.
    #[error("collection exceeds {limit} items")]
    CollectionTooLarge { limit: usize },

    /// Retries were exhausted.
    #[error("{message}")]
    MaxRetriesExceeded { attempts: u32, message: String },
}

impl ManagementError {
    /// Whether this error means the addressed object is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the failure is transient (transport or rate limit).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Unreachable(_)
        )
    }

    /// Whether the tenant answered with a 5xx status.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status >= 500)
    }

    /// Short machine-readable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::AuthError(_) => "AUTH_FAILED",
            Self::Api { .. } => "API_ERROR",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Unreachable(_) => "UNREACHABLE",
            Self::Http(_) => "HTTP_ERROR",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::CollectionTooLarge { .. } => "COLLECTION_TOO_LARGE",
            Self::MaxRetriesExceeded { .. } => "MAX_RETRIES_EXCEEDED",
        }
    }
}

fn timeout_suffix(timeout: &Option<Duration>) -> String {
    match timeout {
        Some(limit) => format!(" after {limit:?}"),
        None => String::new(),
    }
}

impl ManagementError {
    /// Classify a transport failure, naming `timeout` if the request timed out.
    #[must_use]
    pub fn from_transport(error: reqwest::Error, timeout: Option<Duration>) -> Self {
        if error.is_timeout() {
            Self::Timeout { timeout }
        } else {
            Self::from(error)
        }
    }
}

impl From<reqwest::Error> for ManagementError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout { timeout: None }
        } else if error.is_connect() {
            Self::Unreachable(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::Http(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ManagementError {
    fn from(error: serde_json::Error) -> Self {
        Self::ParseError(error.to_string())
    }
}

impl From<url::ParseError> for ManagementError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidConfig(format!("invalid URL: {error}"))
    }
}
