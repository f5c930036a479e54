use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{entities::submission::SubmissionRequest, errors::SubmissionValidationError};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const REQUIRED_FIELDS: [&str; 4] = ["name", "email", "project", "message"];

/// Loose `local@domain.tld` shape check. No further RFC validation.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    // Empty input is reported by the required check instead.
    if email.is_empty() || is_valid_email(email) {
        return Ok(());
    }

    let mut error = ValidationError::new("email_shape");
    error.message = Some("Invalid email address".into());
    Err(error)
}

/// Checks a submission. Missing fields take precedence over a malformed email.
///
/// Values are passed through untouched: no trimming, no HTML escaping.
pub fn validate_submission(request: &SubmissionRequest) -> Result<(), SubmissionValidationError> {
    request.validate().map_err(|errors| classify(&errors))
}

fn classify(errors: &ValidationErrors) -> SubmissionValidationError {
    let field_errors = errors.field_errors();

    let missing = REQUIRED_FIELDS.iter().any(|field| {
        field_errors
            .get(*field)
            .is_some_and(|errs| errs.iter().any(|e| e.code == "required"))
    });

    if missing {
        SubmissionValidationError::MissingFields
    } else {
        SubmissionValidationError::MalformedEmail
    }
}
