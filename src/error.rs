//! Error types for the Chess.com API client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Failures of a logical API call are reported as a single terminal
//! [`ApiError`] carrying the number of attempts made and the root cause.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    Validation { message: String },

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error(transparent)]
    Api(#[from] ApiError),

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// The API error, if this error came from a request
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

// ============================================================================
// ApiError
// ============================================================================

/// Terminal classification of a failed logical call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Client-side mistake or missing resource; never retried
    Permanent,
    /// Server signalled a rate limit and retries were not permitted
    RateLimited,
    /// Network or server transient failure and retries were not permitted
    Transient,
    /// Retries ran out on transient or rate-limited outcomes
    Exhausted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Permanent => "permanent failure",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::Transient => "transient failure",
            ErrorKind::Exhausted => "retries exhausted",
        };
        f.write_str(s)
    }
}

/// Root cause of a failed attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP 429 rate limited{}", fmt_retry_after(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    #[error("request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(String),
}

fn fmt_retry_after(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(", retry after {}ms", d.as_millis()),
        None => String::new(),
    }
}

impl FailureCause {
    /// HTTP status associated with the cause, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FailureCause::Status { status, .. } => Some(*status),
            FailureCause::RateLimited { .. } => Some(429),
            _ => None,
        }
    }
}

/// Error surfaced by the request executor once a call resolves unsuccessfully
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} after {attempts} attempt(s): {cause}")]
pub struct ApiError {
    kind: ErrorKind,
    attempts: u32,
    #[source]
    cause: FailureCause,
}

impl ApiError {
    /// Create a new API error
    pub fn new(kind: ErrorKind, attempts: u32, cause: FailureCause) -> Self {
        Self {
            kind,
            attempts,
            cause,
        }
    }

    /// Terminal classification
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Number of network attempts made
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Cause of the last attempt
    pub fn cause(&self) -> &FailureCause {
        &self.cause
    }

    /// HTTP status of the last attempt, if one was received
    pub fn status(&self) -> Option<u16> {
        self.cause.status()
    }

    /// Whether the resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the resource was permanently removed
    pub fn is_gone(&self) -> bool {
        self.status() == Some(410)
    }

    /// Whether a later, independent call might succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind, ErrorKind::Permanent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_value("quota", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'quota': must be positive"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(
            ErrorKind::Permanent,
            1,
            FailureCause::Status {
                status: 404,
                body: "Not found".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "permanent failure after 1 attempt(s): HTTP 404: Not found"
        );

        let err = ApiError::new(
            ErrorKind::Exhausted,
            3,
            FailureCause::RateLimited {
                retry_after: Some(Duration::from_secs(2)),
            },
        );
        assert_eq!(
            err.to_string(),
            "retries exhausted after 3 attempt(s): HTTP 429 rate limited, retry after 2000ms"
        );
    }

    #[test]
    fn test_api_error_accessors() {
        let err = ApiError::new(
            ErrorKind::Permanent,
            1,
            FailureCause::Status {
                status: 404,
                body: String::new(),
            },
        );
        assert!(err.is_not_found());
        assert!(!err.is_gone());
        assert!(!err.is_retryable());

        let err = ApiError::new(ErrorKind::Exhausted, 3, FailureCause::Timeout { timeout_ms: 50 });
        assert_eq!(err.status(), None);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_from_api_error() {
        let api = ApiError::new(ErrorKind::Transient, 1, FailureCause::Connect("reset".into()));
        let err: Error = api.clone().into();
        assert_eq!(err.as_api(), Some(&api));
    }
}
