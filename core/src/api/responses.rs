use serde_json::Value;

use crate::client::HttpClient;
use crate::error::Result;
use crate::http::{ApiRequest, HttpMethod};
use crate::types::{FormResponse, SubmissionData};

/// Submissions to a form.
#[derive(Debug, Clone, Copy)]
pub struct ResponsesApi<'a> {
    http: &'a HttpClient,
}

impl<'a> ResponsesApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Submit answers keyed by field id or slug.
    pub async fn submit(&self, form_id: &str, data: &SubmissionData) -> Result<FormResponse> {
        self.http.execute_as(&Self::submit_request(form_id, data)).await
    }

    pub async fn list(&self, form_id: &str) -> Result<Vec<FormResponse>> {
        self.http.execute_as(&Self::list_request(form_id)).await
    }

    pub async fn get(&self, form_id: &str, response_id: &str) -> Result<FormResponse> {
        self.http
            .execute_as(&Self::get_request(form_id, response_id))
            .await
    }

    pub fn submit_request(form_id: &str, data: &SubmissionData) -> ApiRequest {
        ApiRequest::new(HttpMethod::Post, format!("/forms/{form_id}/submissions"))
            .with_body(Value::Object(data.clone()))
    }

    pub fn list_request(form_id: &str) -> ApiRequest {
        ApiRequest::new(HttpMethod::Get, format!("/forms/{form_id}/submissions"))
    }

    pub fn get_request(form_id: &str, response_id: &str) -> ApiRequest {
        ApiRequest::new(
            HttpMethod::Get,
            format!("/forms/{form_id}/submissions/{response_id}"),
        )
    }
}
