//! In-memory stand-in for the YourForm API.
//!
//! Serves the forms, fields and submissions routes over an in-memory store,
//! checks the bearer token on every request, and answers 400 with a JSON
//! body for invalid form input. Tests can queue `Fault`s that are returned
//! verbatim, ahead of auth and routing, one per incoming request, and read
//! the number of requests seen so far.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_API_KEY: &str = "test_api_key";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub form_id: String,
    pub data: Map<String, Value>,
    pub submitted_at: String,
}

#[derive(Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<NewField>,
    pub theme: Option<String>,
    pub style: Option<String>,
    pub settings: Option<Value>,
}

#[derive(Deserialize)]
pub struct UpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub style: Option<String>,
    pub settings: Option<Value>,
}

#[derive(Deserialize)]
pub struct NewField {
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    pub slug: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Value>,
    pub placeholder: Option<String>,
}

#[derive(Deserialize)]
pub struct FieldChanges {
    #[serde(rename = "type")]
    pub question_type: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Value>,
    pub placeholder: Option<String>,
}

#[derive(Deserialize)]
pub struct BulkFieldChange {
    pub id: String,
    #[serde(flatten)]
    pub changes: FieldChanges,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// A canned response returned in place of the next request's real one.
#[derive(Clone, Debug)]
pub struct Fault {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Fault {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, self.body).into_response();
        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value)) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

#[derive(Default)]
struct Store {
    forms: HashMap<String, Form>,
    submissions: HashMap<String, Vec<Submission>>,
}

pub struct MockState {
    api_key: String,
    store: RwLock<Store>,
    faults: Mutex<VecDeque<Fault>>,
    hits: AtomicUsize,
}

pub type SharedState = Arc<MockState>;

impl MockState {
    pub fn new(api_key: &str) -> SharedState {
        Arc::new(Self {
            api_key: api_key.to_string(),
            store: RwLock::new(Store::default()),
            faults: Mutex::new(VecDeque::new()),
            hits: AtomicUsize::new(0),
        })
    }

    pub fn push_fault(&self, fault: Fault) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.push_back(fault);
        }
    }

    /// Requests received so far, faulted or not.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn next_fault(&self) -> Option<Fault> {
        self.faults.lock().ok().and_then(|mut faults| faults.pop_front())
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app() -> Router {
    router(MockState::new(DEFAULT_API_KEY))
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/forms", get(list_forms).post(create_form))
        .route(
            "/forms/{id}",
            get(get_form).patch(update_form).delete(delete_form),
        )
        .route("/forms/{id}/publish", post(publish_form))
        .route(
            "/forms/{id}/fields",
            get(list_fields).post(add_fields).patch(update_fields),
        )
        .route(
            "/forms/{id}/fields/{field_id}",
            patch(update_field).delete(remove_field),
        )
        .route(
            "/forms/{id}/submissions",
            get(list_submissions).post(submit),
        )
        .route("/forms/{id}/submissions/{submission_id}", get(get_submission))
        .layer(middleware::from_fn_with_state(state.clone(), gate))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: SharedState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

/// Counts the request, replays a queued fault if there is one, then checks
/// the bearer token.
async fn gate(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    if let Some(fault) = state.next_fault() {
        tracing::debug!(status = fault.status, uri = %request.uri(), "replaying fault");
        return fault.into_response();
    }

    let expected = format!("Bearer {}", state.api_key);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return error(StatusCode::UNAUTHORIZED, "invalid api key");
    }

    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "not found")
}

fn validation_failed(fields: Value) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Validation failed", "fields": fields })),
    )
        .into_response()
}

fn timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    secs.to_string()
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn build_field(input: NewField, position: usize) -> Field {
    Field {
        id: new_id("fld"),
        slug: input.slug.unwrap_or_else(|| format!("question_{position}")),
        question_type: input.question_type,
        title: input.title,
        required: input.required,
        options: input.options,
        placeholder: input.placeholder,
    }
}

fn apply_changes(field: &mut Field, changes: FieldChanges) {
    if let Some(question_type) = changes.question_type {
        field.question_type = question_type;
    }
    if let Some(title) = changes.title {
        field.title = title;
    }
    if let Some(slug) = changes.slug {
        field.slug = slug;
    }
    if changes.required.is_some() {
        field.required = changes.required;
    }
    if changes.options.is_some() {
        field.options = changes.options;
    }
    if changes.placeholder.is_some() {
        field.placeholder = changes.placeholder;
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

async fn list_forms(State(state): State<SharedState>) -> Json<Vec<Form>> {
    let store = state.store.read().await;
    Json(store.forms.values().cloned().collect())
}

async fn create_form(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let input: CreateForm = match serde_json::from_value(body) {
        Ok(input) => input,
        Err(e) => return validation_failed(json!({ "body": e.to_string() })),
    };
    if input.title.trim().is_empty() {
        return validation_failed(json!({ "title": "required" }));
    }

    let now = timestamp();
    let form = Form {
        id: new_id("frm"),
        title: input.title,
        description: input.description,
        questions: input
            .questions
            .into_iter()
            .enumerate()
            .map(|(i, q)| build_field(q, i + 1))
            .collect(),
        theme: input.theme,
        style: input.style.unwrap_or_else(|| "step".to_string()),
        settings: input.settings,
        published: false,
        created_at: now.clone(),
        updated_at: now,
    };
    state.store.write().await.forms.insert(form.id.clone(), form.clone());
    (StatusCode::CREATED, Json(form)).into_response()
}

async fn get_form(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let store = state.store.read().await;
    match store.forms.get(&id) {
        Some(form) => Json(form.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateForm>,
) -> Response {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return validation_failed(json!({ "title": "must not be empty" }));
    }
    let mut store = state.store.write().await;
    let Some(form) = store.forms.get_mut(&id) else {
        return not_found();
    };
    if let Some(title) = input.title {
        form.title = title;
    }
    if input.description.is_some() {
        form.description = input.description;
    }
    if input.theme.is_some() {
        form.theme = input.theme;
    }
    if let Some(style) = input.style {
        form.style = style;
    }
    if input.settings.is_some() {
        form.settings = input.settings;
    }
    form.updated_at = timestamp();
    Json(form.clone()).into_response()
}

async fn delete_form(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut store = state.store.write().await;
    match store.forms.remove(&id) {
        Some(_) => {
            store.submissions.remove(&id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(),
    }
}

async fn publish_form(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut store = state.store.write().await;
    let Some(form) = store.forms.get_mut(&id) else {
        return not_found();
    };
    form.published = true;
    form.updated_at = timestamp();
    Json(form.clone()).into_response()
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

async fn list_fields(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let store = state.store.read().await;
    match store.forms.get(&id) {
        Some(form) => Json(form.questions.clone()).into_response(),
        None => not_found(),
    }
}

async fn add_fields(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(input): Json<OneOrMany<NewField>>,
) -> Response {
    let mut store = state.store.write().await;
    let Some(form) = store.forms.get_mut(&id) else {
        return not_found();
    };
    form.updated_at = timestamp();
    match input {
        OneOrMany::One(new_field) => {
            let field = build_field(new_field, form.questions.len() + 1);
            form.questions.push(field.clone());
            (StatusCode::CREATED, Json(field)).into_response()
        }
        OneOrMany::Many(new_fields) => {
            let mut created = Vec::with_capacity(new_fields.len());
            for new_field in new_fields {
                let field = build_field(new_field, form.questions.len() + 1);
                form.questions.push(field.clone());
                created.push(field);
            }
            (StatusCode::CREATED, Json(created)).into_response()
        }
    }
}

async fn update_fields(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(changes): Json<Vec<BulkFieldChange>>,
) -> Response {
    let mut store = state.store.write().await;
    let Some(form) = store.forms.get_mut(&id) else {
        return not_found();
    };
    if let Some(missing) = changes
        .iter()
        .find(|c| !form.questions.iter().any(|f| f.id == c.id))
    {
        return validation_failed(json!({ "id": format!("unknown field {}", missing.id) }));
    }

    let mut updated = Vec::with_capacity(changes.len());
    for change in changes {
        if let Some(field) = form.questions.iter_mut().find(|f| f.id == change.id) {
            apply_changes(field, change.changes);
            updated.push(field.clone());
        }
    }
    form.updated_at = timestamp();
    Json(updated).into_response()
}

async fn update_field(
    State(state): State<SharedState>,
    Path((id, field_id)): Path<(String, String)>,
    Json(changes): Json<FieldChanges>,
) -> Response {
    let mut store = state.store.write().await;
    let Some(form) = store.forms.get_mut(&id) else {
        return not_found();
    };
    let Some(field) = form.questions.iter_mut().find(|f| f.id == field_id) else {
        return not_found();
    };
    apply_changes(field, changes);
    let field = field.clone();
    form.updated_at = timestamp();
    Json(field).into_response()
}

async fn remove_field(
    State(state): State<SharedState>,
    Path((id, field_id)): Path<(String, String)>,
) -> Response {
    let mut store = state.store.write().await;
    let Some(form) = store.forms.get_mut(&id) else {
        return not_found();
    };
    let before = form.questions.len();
    form.questions.retain(|f| f.id != field_id);
    if form.questions.len() == before {
        return not_found();
    }
    form.updated_at = timestamp();
    StatusCode::NO_CONTENT.into_response()
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

async fn submit(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(data): Json<Map<String, Value>>,
) -> Response {
    let mut store = state.store.write().await;
    if !store.forms.contains_key(&id) {
        return not_found();
    }
    let submission = Submission {
        id: new_id("sub"),
        form_id: id.clone(),
        data,
        submitted_at: timestamp(),
    };
    store.submissions.entry(id).or_default().push(submission.clone());
    (StatusCode::CREATED, Json(submission)).into_response()
}

async fn list_submissions(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let store = state.store.read().await;
    if !store.forms.contains_key(&id) {
        return not_found();
    }
    let submissions = store.submissions.get(&id).cloned().unwrap_or_default();
    Json(submissions).into_response()
}

async fn get_submission(
    State(state): State<SharedState>,
    Path((id, submission_id)): Path<(String, String)>,
) -> Response {
    let store = state.store.read().await;
    store
        .submissions
        .get(&id)
        .and_then(|subs| subs.iter().find(|s| s.id == submission_id))
        .map(|s| Json(s.clone()).into_response())
        .unwrap_or_else(not_found)
}
