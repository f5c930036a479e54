use std::time::Duration;

use actix_web::{
    error::ResponseError,
    http::{header::{self, ContentType}, StatusCode},
    HttpResponse
};
use derive_more::Display;

use crate::entities::submission::SubmissionResponse;

pub const RATE_LIMITED_MESSAGE: &str = "Too many form submissions, please try again later.";
pub const DISPATCH_FAILED_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Reasons a submission is rejected before any mail is sent.
/// The display text is exactly what the client receives.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionValidationError {
    #[display("All fields are required")]
    MissingFields,

    #[display("Invalid email address")]
    MalformedEmail,
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Invalid mailbox {_0}")]
    InvalidAddress(String),

    #[display("Failed to build message: {_0}")]
    Build(String),

    #[display("SMTP transport error: {_0}")]
    Transport(String),

    #[display("Send timed out after {}s", _0.as_secs())]
    Timeout(Duration),
}

#[derive(Debug, Display)]
pub enum TemplateError {
    #[display("Template not found: {_0}")]
    NotFound(String),

    #[display("Failed to read template {_0}: {_1}")]
    Io(String, std::io::Error),
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    #[display("owner notification")]
    OwnerNotification,

    #[display("submitter confirmation")]
    Confirmation,
}

#[derive(Debug, Display)]
pub enum DispatchCause {
    #[display("{_0}")]
    Template(TemplateError),

    #[display("{_0}")]
    Mail(MailError),
}

/// A failed dispatch, tagged with the leg that failed.
///
/// When `stage` is `Confirmation` the owner notification has already been
/// delivered; nothing is rolled back.
#[derive(Debug, Display)]
#[display("{stage} failed: {cause}")]
pub struct DispatchError {
    pub stage: DispatchStage,
    pub cause: DispatchCause,
}

impl DispatchError {
    pub fn template(stage: DispatchStage, err: TemplateError) -> Self {
        DispatchError { stage, cause: DispatchCause::Template(err) }
    }

    pub fn mail(stage: DispatchStage, err: MailError) -> Self {
        DispatchError { stage, cause: DispatchCause::Mail(err) }
    }
}

/// Client-facing error taxonomy. Internal causes never leak into the body.
#[derive(Debug, Display)]
pub enum AppError {
    #[display("{_0}")]
    Validation(SubmissionValidationError),

    #[display("{}", RATE_LIMITED_MESSAGE)]
    RateLimited { retry_after: Duration },

    #[display("{}", DISPATCH_FAILED_MESSAGE)]
    DispatchFailed,
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = SubmissionResponse::failure(self.to_string());

        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());

        if let AppError::RateLimited { retry_after } = self {
            let secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
            builder.insert_header((header::RETRY_AFTER, secs.to_string()));
        }

        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::DispatchFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SubmissionValidationError> for AppError {
    fn from(err: SubmissionValidationError) -> Self {
        AppError::Validation(err)
    }
}
