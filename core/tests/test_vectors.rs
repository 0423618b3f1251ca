//! Verify facade request builders and response classification against the
//! JSON test vectors in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON values so property order doesn't
//! matter.

use serde_json::Value;
use yourform_core::retry::{classify, Outcome};
use yourform_core::{
    ApiRequest, CreateForm, ErrorKind, FieldPatch, FieldUpdate, FieldsApi, FormsApi, HttpMethod,
    HttpResponse, NewField, ResponsesApi, Result, SubmissionData, UpdateForm, YourFormError,
};

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "generic" => ErrorKind::Generic,
        "authentication" => ErrorKind::Authentication,
        "rate_limit" => ErrorKind::RateLimit,
        "validation" => ErrorKind::Validation,
        "server" => ErrorKind::Server,
        other => panic!("unknown error kind: {other}"),
    }
}

fn arg<'a>(args: &'a Value, name: &str) -> &'a str {
    args[name].as_str().unwrap_or_else(|| panic!("missing arg {name}"))
}

fn input<T: serde::de::DeserializeOwned>(args: &Value) -> T {
    serde_json::from_value(args["input"].clone()).unwrap()
}

/// Run the request builder named by `operation`.
fn build(operation: &str, args: &Value) -> Result<ApiRequest> {
    match operation {
        "forms.list" => Ok(FormsApi::list_request()),
        "forms.get" => Ok(FormsApi::get_request(arg(args, "id"))),
        "forms.create" => FormsApi::create_request(&input::<CreateForm>(args)),
        "forms.update" => FormsApi::update_request(arg(args, "id"), &input::<UpdateForm>(args)),
        "forms.delete" => Ok(FormsApi::delete_request(arg(args, "id"))),
        "forms.publish" => Ok(FormsApi::publish_request(arg(args, "id"))),
        "fields.list" => Ok(FieldsApi::list_request(arg(args, "form_id"))),
        "fields.add" => FieldsApi::add_request(arg(args, "form_id"), &input::<NewField>(args)),
        "fields.add_many" => {
            FieldsApi::add_many_request(arg(args, "form_id"), &input::<Vec<NewField>>(args))
        }
        "fields.update" => FieldsApi::update_request(
            arg(args, "form_id"),
            arg(args, "field_id"),
            &input::<FieldPatch>(args),
        ),
        "fields.update_many" => {
            FieldsApi::update_many_request(arg(args, "form_id"), &input::<Vec<FieldUpdate>>(args))
        }
        "fields.remove" => Ok(FieldsApi::remove_request(
            arg(args, "form_id"),
            arg(args, "field_id"),
        )),
        "responses.submit" => Ok(ResponsesApi::submit_request(
            arg(args, "form_id"),
            &input::<SubmissionData>(args),
        )),
        "responses.list" => Ok(ResponsesApi::list_request(arg(args, "form_id"))),
        "responses.get" => Ok(ResponsesApi::get_request(
            arg(args, "form_id"),
            arg(args, "response_id"),
        )),
        other => panic!("unknown operation: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];

        let req = build(case["operation"].as_str().unwrap(), &case["args"])
            .unwrap_or_else(|e| panic!("{name}: unexpected error {e}"));

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(req.body.unwrap_or(Value::Null), expected["body"], "{name}: body");
    }
}

#[test]
fn rejected_request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["rejected"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let offending = case["offending_value"].as_str().unwrap();

        let err = build(case["operation"].as_str().unwrap(), &case["args"])
            .err()
            .unwrap_or_else(|| panic!("{name}: expected a validation error"));

        assert_eq!(err.kind(), ErrorKind::Validation, "{name}: kind");
        assert_eq!(err.details().unwrap()["value"], offending, "{name}: details");
        assert!(err.message().contains(offending), "{name}: message");
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn classification_test_vectors() {
    let raw = include_str!("../../test-vectors/classification.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: sim["headers"]
                .as_array()
                .unwrap()
                .iter()
                .map(|h| {
                    let pair = h.as_array().unwrap();
                    (
                        pair[0].as_str().unwrap().to_string(),
                        pair[1].as_str().unwrap().to_string(),
                    )
                })
                .collect(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let attempt = case["attempt"].as_u64().unwrap() as u32;
        let max_retries = case["max_retries"].as_u64().unwrap() as u32;
        let expected = &case["expected"];

        match (expected["outcome"].as_str().unwrap(), classify(response, attempt, max_retries)) {
            ("success", Outcome::Success(value)) => {
                assert_eq!(value, expected["value"], "{name}: value");
            }
            ("retry", Outcome::Retry(delay)) => {
                assert_eq!(
                    delay.as_millis() as u64,
                    expected["delay_ms"].as_u64().unwrap(),
                    "{name}: delay"
                );
            }
            ("fail", Outcome::Fail(err)) => check_failure(name, &err, expected),
            (want, got) => panic!("{name}: expected {want}, got {got:?}"),
        }
    }
}

fn check_failure(name: &str, err: &YourFormError, expected: &Value) {
    assert_eq!(err.kind(), parse_kind(expected["kind"].as_str().unwrap()), "{name}: kind");
    if let Some(status) = expected.get("status") {
        assert_eq!(err.status().map(u64::from), status.as_u64(), "{name}: status");
    }
    if let Some(details) = expected.get("details") {
        assert_eq!(err.details(), Some(details), "{name}: details");
    }
    if let Some(info) = err.rate_limit_info() {
        assert_eq!(info.limit, expected["limit"].as_u64().unwrap(), "{name}: limit");
        assert_eq!(info.remaining, expected["remaining"].as_u64().unwrap(), "{name}: remaining");
        assert_eq!(info.reset, expected["reset"].as_u64().unwrap(), "{name}: reset");
    }
}
