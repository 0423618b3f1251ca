//! Async client for the YourForm REST API.
//!
//! # Overview
//! `YourForm` bundles three resource facades (`forms()`, `fields()`,
//! `responses()`) over one request core. The core attaches the bearer token,
//! sends JSON, retries network failures, 429s and 5xx responses with
//! exponential backoff, and maps every terminal failure to a
//! `YourFormError`.
//!
//! # Design
//! - `ClientConfig` is immutable; `HttpClient` keeps no per-call state, so a
//!   single client is safe to share across tasks.
//! - The retry policy (`retry::classify`) is a pure function over plain
//!   `HttpResponse` data; the async loop only sends and sleeps.
//! - Facade `*_request` builders are pure and do all client-side validation,
//!   so invalid enum values fail before any network call.
//! - Records keep unknown JSON properties in a flattened `extra` map.
//!
//! ```rust,no_run
//! use yourform_core::{CreateForm, NewField, QuestionType, YourForm};
//!
//! # async fn run() -> Result<(), yourform_core::YourFormError> {
//! let client = YourForm::with_api_key("sk_live_...")?;
//! let form = client
//!     .forms()
//!     .create(&CreateForm {
//!         questions: Some(vec![NewField::new(QuestionType::Email, "Your email")]),
//!         ..CreateForm::new("Newsletter")
//!     })
//!     .await?;
//! client.forms().publish(&form.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod transport;
pub mod types;
mod yourform;

pub use api::{FieldsApi, FormsApi, ResponsesApi};
pub use client::HttpClient;
pub use config::ClientConfig;
pub use error::{ErrorKind, RateLimitInfo, Result, YourFormError};
pub use http::{ApiRequest, HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport, TransportError};
pub use types::{
    validate_form_style, validate_question_type, CreateForm, Field, FieldPatch, FieldUpdate, Form,
    FormResponse, FormStyle, NewField, QuestionType, SubmissionData, UpdateForm,
};
pub use yourform::YourForm;
