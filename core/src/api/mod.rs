//! Resource facades.
//!
//! Each facade borrows the shared `HttpClient` and maps domain operations to
//! `ApiRequest`s. The `*_request` builders are pure and do all client-side
//! validation, so an invalid call fails before any network traffic.

mod fields;
mod forms;
mod responses;

pub use fields::FieldsApi;
pub use forms::FormsApi;
pub use responses::ResponsesApi;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, YourFormError};

fn to_body<T: Serialize + ?Sized>(input: &T) -> Result<Value> {
    serde_json::to_value(input)
        .map_err(|e| YourFormError::generic(format!("failed to serialize request body: {e}")))
}
