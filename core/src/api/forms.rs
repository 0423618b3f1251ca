use serde_json::Value;

use super::to_body;
use crate::client::HttpClient;
use crate::error::Result;
use crate::http::{ApiRequest, HttpMethod};
use crate::types::{validate_form_style, validate_question_type, CreateForm, Form, FormStyle, UpdateForm};

/// Forms owned by the authenticated account.
#[derive(Debug, Clone, Copy)]
pub struct FormsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> FormsApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> Result<Vec<Form>> {
        self.http.execute_as(&Self::list_request()).await
    }

    pub async fn get(&self, id: &str) -> Result<Form> {
        self.http.execute_as(&Self::get_request(id)).await
    }

    /// Create a form. `style` defaults to `step`; the style and every
    /// initial question's type are validated before sending.
    pub async fn create(&self, input: &CreateForm) -> Result<Form> {
        let request = Self::create_request(input)?;
        self.http.execute_as(&request).await
    }

    pub async fn update(&self, id: &str, input: &UpdateForm) -> Result<Form> {
        let request = Self::update_request(id, input)?;
        self.http.execute_as(&request).await
    }

    /// Permanently delete a form with all of its fields and responses.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.http.execute(&Self::delete_request(id)).await?;
        Ok(())
    }

    pub async fn publish(&self, id: &str) -> Result<Form> {
        self.http.execute_as(&Self::publish_request(id)).await
    }

    pub fn list_request() -> ApiRequest {
        ApiRequest::new(HttpMethod::Get, "/forms")
    }

    pub fn get_request(id: &str) -> ApiRequest {
        ApiRequest::new(HttpMethod::Get, format!("/forms/{id}"))
    }

    pub fn create_request(input: &CreateForm) -> Result<ApiRequest> {
        let style = match input.style.as_deref() {
            Some(style) => validate_form_style(style)?,
            None => FormStyle::default(),
        };
        for question in input.questions.iter().flatten() {
            validate_question_type(&question.question_type)?;
        }

        let mut body = to_body(input)?;
        if let Value::Object(map) = &mut body {
            map.insert("style".to_string(), Value::from(style.as_str()));
        }
        Ok(ApiRequest::new(HttpMethod::Post, "/forms").with_body(body))
    }

    pub fn update_request(id: &str, input: &UpdateForm) -> Result<ApiRequest> {
        if let Some(style) = input.style.as_deref() {
            validate_form_style(style)?;
        }
        Ok(ApiRequest::new(HttpMethod::Patch, format!("/forms/{id}")).with_body(to_body(input)?))
    }

    pub fn delete_request(id: &str) -> ApiRequest {
        ApiRequest::new(HttpMethod::Delete, format!("/forms/{id}"))
    }

    pub fn publish_request(id: &str) -> ApiRequest {
        ApiRequest::new(HttpMethod::Post, format!("/forms/{id}/publish"))
    }
}
