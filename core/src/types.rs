//! Domain records and inputs for the YourForm API.
//!
//! # Design
//! Records mirror the service's JSON (camelCase) and keep any property this
//! crate does not model in a flattened `extra` map, so nothing the server
//! sends is dropped. Enumerated fields (`type`, `style`) are plain strings on
//! the wire types and checked against `QuestionType` / `FormStyle` by the
//! facades before anything is sent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Result, YourFormError};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortText,
    LongText,
    Dropdown,
    Checkboxes,
    Email,
    Phone,
    Number,
    Date,
    Rating,
    OpinionScale,
    YesNo,
    FileUpload,
    Website,
    Matrix,
    MultipleChoice,
}

impl QuestionType {
    pub const ALL: [QuestionType; 15] = [
        QuestionType::ShortText,
        QuestionType::LongText,
        QuestionType::Dropdown,
        QuestionType::Checkboxes,
        QuestionType::Email,
        QuestionType::Phone,
        QuestionType::Number,
        QuestionType::Date,
        QuestionType::Rating,
        QuestionType::OpinionScale,
        QuestionType::YesNo,
        QuestionType::FileUpload,
        QuestionType::Website,
        QuestionType::Matrix,
        QuestionType::MultipleChoice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ShortText => "short_text",
            QuestionType::LongText => "long_text",
            QuestionType::Dropdown => "dropdown",
            QuestionType::Checkboxes => "checkboxes",
            QuestionType::Email => "email",
            QuestionType::Phone => "phone",
            QuestionType::Number => "number",
            QuestionType::Date => "date",
            QuestionType::Rating => "rating",
            QuestionType::OpinionScale => "opinion_scale",
            QuestionType::YesNo => "yes_no",
            QuestionType::FileUpload => "file_upload",
            QuestionType::Website => "website",
            QuestionType::Matrix => "matrix",
            QuestionType::MultipleChoice => "multiple_choice",
        }
    }
}

/// Form layout styles. `Step` is used when a new form doesn't name one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStyle {
    Classic,
    #[default]
    Step,
    MultiStep,
    Chat,
    Card,
    Survey,
}

impl FormStyle {
    pub const ALL: [FormStyle; 6] = [
        FormStyle::Classic,
        FormStyle::Step,
        FormStyle::MultiStep,
        FormStyle::Chat,
        FormStyle::Card,
        FormStyle::Survey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStyle::Classic => "classic",
            FormStyle::Step => "step",
            FormStyle::MultiStep => "multi_step",
            FormStyle::Chat => "chat",
            FormStyle::Card => "card",
            FormStyle::Survey => "survey",
        }
    }
}

macro_rules! string_enum_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ();

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                <$ty>::ALL.iter().copied().find(|v| v.as_str() == s).ok_or(())
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.as_str().to_string()
            }
        }
    };
}

string_enum_impls!(QuestionType);
string_enum_impls!(FormStyle);

/// Check `value` against the supported question types.
pub fn validate_question_type(value: &str) -> Result<QuestionType> {
    value.parse().map_err(|_| {
        let allowed: Vec<&str> = QuestionType::ALL.iter().map(|t| t.as_str()).collect();
        unsupported("question type", "types", value, &allowed)
    })
}

/// Check `value` against the supported form styles.
pub fn validate_form_style(value: &str) -> Result<FormStyle> {
    value.parse().map_err(|_| {
        let allowed: Vec<&str> = FormStyle::ALL.iter().map(|s| s.as_str()).collect();
        unsupported("form style", "styles", value, &allowed)
    })
}

fn unsupported(what: &str, plural: &str, value: &str, allowed: &[&str]) -> YourFormError {
    YourFormError::validation(
        format!(
            "Unsupported {what}: {value}. Supported {plural} are: {}",
            allowed.join(", ")
        ),
        json!({ "value": value, "allowed": allowed }),
    )
}

// ---------------------------------------------------------------------------
// Records returned by the service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A question on a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A submission to a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: String,
    pub form_id: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Answers keyed by field id or slug.
pub type SubmissionData = Map<String, Value>;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A field to create, on its own or as one of a new form's questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewField {
    #[serde(rename = "type")]
    pub question_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl NewField {
    pub fn new(question_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            question_type: question_type.into(),
            title: title.into(),
            slug: None,
            required: None,
            options: None,
            placeholder: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Partial update for a single field. Omitted properties are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// One entry of a bulk field update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub id: String,
    #[serde(flatten)]
    pub patch: FieldPatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateForm {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<NewField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Defaults to `step` when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl CreateForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}
