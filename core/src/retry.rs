//! Retry policy: response classification and backoff.
//!
//! # Design
//! `classify` is pure. It looks at one attempt's result and decides whether
//! the call succeeded, should be retried after some delay, or has failed for
//! good. The async loop in `client` only sleeps and re-sends, so the whole
//! policy is unit-testable without a clock or a network.
//!
//! An attempt index starts at 0 and the last allowed attempt is
//! `attempt == max_retries`.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::{RateLimitInfo, YourFormError};
use crate::http::HttpResponse;
use crate::transport::TransportError;

const BACKOFF_BASE_MS: u64 = 1000;
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// What to do after one attempt.
#[derive(Debug)]
pub enum Outcome {
    Success(Value),
    Retry(Duration),
    Fail(YourFormError),
}

/// `2^attempt * 1000` ms. Attempt 0 (first retry) waits one second.
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor))
}

/// `Retry-After` in whole seconds, defaulting to one second when absent or
/// unparseable.
pub fn retry_after_delay(response: &HttpResponse) -> Duration {
    let secs = response
        .header("retry-after")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
    Duration::from_millis(secs.saturating_mul(1000))
}

impl RateLimitInfo {
    pub fn from_headers(response: &HttpResponse) -> Self {
        let read = |name: &str| {
            response
                .header(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(0)
        };
        Self {
            limit: read("x-ratelimit-limit"),
            remaining: read("x-ratelimit-remaining"),
            reset: read("x-ratelimit-reset"),
        }
    }
}

fn is_last(attempt: u32, max_retries: u32) -> bool {
    attempt >= max_retries
}

/// Classify a request that never got a response.
pub fn classify_transport_error(error: TransportError, attempt: u32, max_retries: u32) -> Outcome {
    if is_last(attempt, max_retries) {
        return Outcome::Fail(YourFormError::generic(error.0));
    }
    Outcome::Retry(backoff_delay(attempt))
}

/// Classify an HTTP response.
pub fn classify(response: HttpResponse, attempt: u32, max_retries: u32) -> Outcome {
    if response.is_success() {
        return match parse_success_body(&response.body) {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::Fail(err),
        };
    }

    let status = response.status;
    let last = is_last(attempt, max_retries);

    if status == 429 {
        let delay = retry_after_delay(&response).max(backoff_delay(attempt));
        if last {
            return Outcome::Fail(YourFormError::RateLimit {
                message: "Rate limit exceeded after maximum retries".to_string(),
                retry_after_ms: delay.as_millis() as u64,
                info: RateLimitInfo::from_headers(&response),
            });
        }
        return Outcome::Retry(delay);
    }

    if status >= 500 {
        if last {
            return Outcome::Fail(YourFormError::Server {
                message: format!("Server error ({status})"),
                status,
            });
        }
        return Outcome::Retry(backoff_delay(attempt));
    }

    if status == 401 || status == 403 {
        return Outcome::Fail(YourFormError::authentication(
            "API key is invalid or unauthorized",
        ));
    }

    if status == 400 {
        let details = serde_json::from_str(&response.body).unwrap_or_else(|_| json!({}));
        return Outcome::Fail(YourFormError::validation("Validation failed", details));
    }

    Outcome::Fail(YourFormError::generic(format!(
        "Request failed with status {status}"
    )))
}

/// An empty body (e.g. `204 No Content`) is `null`.
fn parse_success_body(body: &str) -> Result<Value, YourFormError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|e| YourFormError::generic(format!("invalid JSON in response body: {e}")))
}
