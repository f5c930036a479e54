use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{
    errors::{AppError, SubmissionValidationError},
    use_cases::validator::validate_email_shape,
};

pub const ACCEPTED_MESSAGE: &str = "Form submitted successfully! We will contact you soon.";

/// Contact form fields as posted by the browser.
/// Absent fields deserialize as empty strings so they fail the required check;
/// non-string JSON values are coerced by `lenient_string`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct SubmissionRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1, code = "required"))]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_email_shape")
    )]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1, code = "required"))]
    pub project: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 1, code = "required"))]
    pub message: String,
}

/// Reads any JSON scalar as text. `null`, `false` and zero read as empty (and so
/// count as missing); other numbers and `true` keep their literal form, arrays and
/// objects their JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "true".to_string(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    Ok(text)
}

impl SubmissionRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        project: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SubmissionRequest {
            name: name.into(),
            email: email.into(),
            project: project.into(),
            message: message.into(),
        }
    }
}

/// Terminal state of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted,
    ValidationFailed(SubmissionValidationError),
    RateLimited { retry_after: Duration },
    DispatchFailed,
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted)
    }

    pub fn into_result(self) -> Result<SubmissionResponse, AppError> {
        match self {
            SubmissionOutcome::Accepted => Ok(SubmissionResponse::success(ACCEPTED_MESSAGE)),
            SubmissionOutcome::ValidationFailed(reason) => Err(AppError::Validation(reason)),
            SubmissionOutcome::RateLimited { retry_after } => Err(AppError::RateLimited { retry_after }),
            SubmissionOutcome::DispatchFailed => Err(AppError::DispatchFailed),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
}

impl SubmissionResponse {
    pub fn success(message: impl Into<String>) -> Self {
        SubmissionResponse { success: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        SubmissionResponse { success: false, message: message.into() }
    }
}
