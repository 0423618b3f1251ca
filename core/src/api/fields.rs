use super::to_body;
use crate::client::HttpClient;
use crate::error::Result;
use crate::http::{ApiRequest, HttpMethod};
use crate::types::{validate_question_type, Field, FieldPatch, FieldUpdate, NewField};

/// Fields (questions) within a form.
///
/// Single and bulk variants of `add` / `update` are separate methods. The
/// request body is forwarded in the shape it was given: one object for the
/// single variants, an array for the bulk ones.
#[derive(Debug, Clone, Copy)]
pub struct FieldsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> FieldsApi<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, form_id: &str) -> Result<Vec<Field>> {
        self.http.execute_as(&Self::list_request(form_id)).await
    }

    pub async fn add(&self, form_id: &str, field: &NewField) -> Result<Field> {
        let request = Self::add_request(form_id, field)?;
        self.http.execute_as(&request).await
    }

    pub async fn add_many(&self, form_id: &str, fields: &[NewField]) -> Result<Vec<Field>> {
        let request = Self::add_many_request(form_id, fields)?;
        self.http.execute_as(&request).await
    }

    pub async fn update(&self, form_id: &str, field_id: &str, patch: &FieldPatch) -> Result<Field> {
        let request = Self::update_request(form_id, field_id, patch)?;
        self.http.execute_as(&request).await
    }

    pub async fn update_many(&self, form_id: &str, updates: &[FieldUpdate]) -> Result<Vec<Field>> {
        let request = Self::update_many_request(form_id, updates)?;
        self.http.execute_as(&request).await
    }

    pub async fn remove(&self, form_id: &str, field_id: &str) -> Result<()> {
        self.http
            .execute(&Self::remove_request(form_id, field_id))
            .await?;
        Ok(())
    }

    pub fn list_request(form_id: &str) -> ApiRequest {
        ApiRequest::new(HttpMethod::Get, format!("/forms/{form_id}/fields"))
    }

    pub fn add_request(form_id: &str, field: &NewField) -> Result<ApiRequest> {
        validate_question_type(&field.question_type)?;
        Ok(ApiRequest::new(HttpMethod::Post, format!("/forms/{form_id}/fields")).with_body(to_body(field)?))
    }

    pub fn add_many_request(form_id: &str, fields: &[NewField]) -> Result<ApiRequest> {
        for field in fields {
            validate_question_type(&field.question_type)?;
        }
        Ok(ApiRequest::new(HttpMethod::Post, format!("/forms/{form_id}/fields")).with_body(to_body(fields)?))
    }

    pub fn update_request(form_id: &str, field_id: &str, patch: &FieldPatch) -> Result<ApiRequest> {
        validate_patch(patch)?;
        Ok(
            ApiRequest::new(HttpMethod::Patch, format!("/forms/{form_id}/fields/{field_id}"))
                .with_body(to_body(patch)?),
        )
    }

    pub fn update_many_request(form_id: &str, updates: &[FieldUpdate]) -> Result<ApiRequest> {
        for update in updates {
            validate_patch(&update.patch)?;
        }
        Ok(ApiRequest::new(HttpMethod::Patch, format!("/forms/{form_id}/fields")).with_body(to_body(updates)?))
    }

    pub fn remove_request(form_id: &str, field_id: &str) -> ApiRequest {
        ApiRequest::new(HttpMethod::Delete, format!("/forms/{form_id}/fields/{field_id}"))
    }
}

fn validate_patch(patch: &FieldPatch) -> Result<()> {
    if let Some(question_type) = patch.question_type.as_deref() {
        validate_question_type(question_type)?;
    }
    Ok(())
}
