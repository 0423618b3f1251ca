//! Error taxonomy for the YourForm client.
//!
//! # Design
//! Every failure the SDK raises is a `YourFormError`. Each variant carries
//! only the fields relevant to its kind, and `kind()` gives callers a flat
//! discriminator when they don't want to match on the payload. Retryable
//! conditions (network, 429, 5xx) only surface here once the retry budget is
//! spent; everything else surfaces on first occurrence.

use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, YourFormError>;

/// Quota metadata reported by the `x-ratelimit-*` response headers.
///
/// Missing or unparseable headers are recorded as `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: u64,
    pub remaining: u64,
    /// Window reset time in UTC epoch seconds.
    pub reset: u64,
}

/// Discriminator for `YourFormError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Generic,
    Authentication,
    RateLimit,
    Validation,
    Server,
}

#[derive(Debug, Error)]
pub enum YourFormError {
    /// Catch-all: network failures after retries, unexpected statuses,
    /// undecodable bodies, bad configuration.
    #[error("{message}")]
    Generic { message: String },

    /// The server answered 401 or 403. Never retried.
    #[error("{message}")]
    Authentication { message: String },

    /// The server kept answering 429 until the retry budget ran out.
    #[error("{message}")]
    RateLimit {
        message: String,
        /// Milliseconds the client would have waited before another attempt.
        retry_after_ms: u64,
        info: RateLimitInfo,
    },

    /// Rejected input, either by the client-side enum checks or by a 400
    /// from the server (whose JSON body becomes `details`).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The server kept answering 5xx until the retry budget ran out.
    #[error("{message}")]
    Server { message: String, status: u16 },
}

impl YourFormError {
    pub fn generic(message: impl Into<String>) -> Self {
        YourFormError::Generic {
            message: message.into(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        YourFormError::Authentication {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        YourFormError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            YourFormError::Generic { .. } => ErrorKind::Generic,
            YourFormError::Authentication { .. } => ErrorKind::Authentication,
            YourFormError::RateLimit { .. } => ErrorKind::RateLimit,
            YourFormError::Validation { .. } => ErrorKind::Validation,
            YourFormError::Server { .. } => ErrorKind::Server,
        }
    }

    /// Always `true`. Lets callers holding a `Box<dyn Error>` check for SDK
    /// errors after a `downcast_ref::<YourFormError>()`.
    pub fn is_sdk_error(&self) -> bool {
        true
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, YourFormError::RateLimit { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            YourFormError::Generic { message }
            | YourFormError::Authentication { message }
            | YourFormError::RateLimit { message, .. }
            | YourFormError::Validation { message, .. }
            | YourFormError::Server { message, .. } => message,
        }
    }

    /// HTTP status for `Server` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            YourFormError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            YourFormError::Validation { details, .. } => Some(details),
            _ => None,
        }
    }

    pub fn rate_limit_info(&self) -> Option<RateLimitInfo> {
        match self {
            YourFormError::RateLimit { info, .. } => Some(*info),
            _ => None,
        }
    }
}
