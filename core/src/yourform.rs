//! The `YourForm` entry point.

use std::sync::Arc;

use crate::api::{FieldsApi, FormsApi, ResponsesApi};
use crate::client::HttpClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::transport::Transport;

/// One configured client exposing the forms, fields and responses APIs over
/// a shared request core.
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct YourForm {
    http: HttpClient,
}

impl YourForm {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: HttpClient::new(config),
        }
    }

    /// Shorthand for `YourForm::new(ClientConfig::new(api_key)?)`.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::new(ClientConfig::new(api_key)?))
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    /// Route requests through a custom transport. Intended for tests.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            http: HttpClient::with_transport(config, transport),
        }
    }

    pub fn forms(&self) -> FormsApi<'_> {
        FormsApi::new(&self.http)
    }

    pub fn fields(&self) -> FieldsApi<'_> {
        FieldsApi::new(&self.http)
    }

    pub fn responses(&self) -> ResponsesApi<'_> {
        ResponsesApi::new(&self.http)
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}
