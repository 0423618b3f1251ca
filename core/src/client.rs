//! Request core: one logical API call, end to end.
//!
//! # Design
//! `HttpClient` owns the immutable `ClientConfig` and a transport. `execute`
//! turns an `ApiRequest` into an authenticated `HttpRequest`, sends it, and
//! hands each result to `retry::classify`. Retries sleep on the tokio timer
//! between attempts. No state survives a call, so one client can be shared
//! by any number of concurrent tasks without locking.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Result, YourFormError};
use crate::http::{ApiRequest, HttpRequest};
use crate::retry::{self, Outcome};
use crate::transport::{ReqwestTransport, Transport};

const USER_AGENT: &str = concat!("yourform-rust/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Apply the base URL, auth and JSON headers to a logical request.
    pub fn build_request(&self, request: &ApiRequest) -> Result<HttpRequest> {
        let body = request
            .body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| YourFormError::generic(format!("failed to serialize request body: {e}")))?;

        Ok(HttpRequest {
            method: request.method,
            url: format!("{}{}", self.config.base_url(), request.path),
            headers: vec![
                (
                    "authorization".to_string(),
                    format!("Bearer {}", self.config.api_key()),
                ),
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
                ("user-agent".to_string(), USER_AGENT.to_string()),
            ],
            body,
        })
    }

    /// Run `request` with up to `max_retries` retries and return the parsed
    /// JSON body (`null` for an empty one).
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
        let http_request = self.build_request(request)?;
        let max_retries = self.config.max_retries();

        for attempt in 0..=max_retries {
            tracing::debug!(
                method = request.method.as_str(),
                path = %request.path,
                attempt,
                "sending request"
            );

            let (outcome, reason) = match self.transport.send(http_request.clone()).await {
                Ok(response) => {
                    let reason = format!("status {}", response.status);
                    (retry::classify(response, attempt, max_retries), reason)
                }
                Err(err) => {
                    let reason = err.to_string();
                    (retry::classify_transport_error(err, attempt, max_retries), reason)
                }
            };

            match outcome {
                Outcome::Success(value) => return Ok(value),
                Outcome::Fail(err) => {
                    tracing::debug!(path = %request.path, attempt, kind = ?err.kind(), "request failed");
                    return Err(err);
                }
                Outcome::Retry(delay) => {
                    tracing::warn!(
                        method = request.method.as_str(),
                        path = %request.path,
                        attempt,
                        delay = ?delay,
                        reason = %reason,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(YourFormError::generic("Request failed after maximum retries"))
    }

    /// `execute`, then decode the body into `T`.
    pub async fn execute_as<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let value = self.execute(request).await?;
        serde_json::from_value(value).map_err(|e| {
            YourFormError::generic(format!("unexpected response shape from {}: {e}", request.path))
        })
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
