//! Network transport behind the request core.
//!
//! `ReqwestTransport` is what `YourForm::new` uses. The `Transport` trait only
//! exists so tests can replay scripted responses; the policy around it
//! (headers, JSON, retry, error mapping) lives in `client`.

use async_trait::async_trait;
use thiserror::Error;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// The request never produced an HTTP status (connect, DNS, I/O).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one network round-trip.
    ///
    /// Non-2xx statuses are returned as `Ok`; only a missing response is an
    /// error.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        // Once the status is known the response exists; a broken body is
        // left for the status classification to judge.
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(status, error = %e, "failed to read response body");
                String::new()
            }
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
