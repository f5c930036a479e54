use std::time::Instant;

use actix_web::{http::header, web, Either, HttpRequest, HttpResponse};

use crate::{
    entities::submission::SubmissionRequest,
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

type SubmissionPayload = Either<web::Json<SubmissionRequest>, web::Form<SubmissionRequest>>;

/// `GET /submit-form`: the form lives elsewhere, send browsers to the site.
pub async fn redirect_to_site(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, state.redirect_url.as_str()))
        .finish()
}

/// `POST /submit-form`, JSON or url-encoded.
///
/// A body that decodes as neither is treated as an empty submission, after
/// the rate limiter has counted it.
pub async fn submit_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Result<SubmissionPayload, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let client_key = get_client_ip(&req, state.trust_x_forwarded_for);

    let request = match payload {
        Ok(Either::Left(json)) => json.into_inner(),
        Ok(Either::Right(form)) => form.into_inner(),
        Err(e) => {
            tracing::debug!(client = %client_key, "Undecodable submission body: {}", e);
            SubmissionRequest::default()
        }
    };

    let body = state
        .contact_handler
        .submit(&client_key, request, Instant::now())
        .await
        .into_result()?;

    Ok(HttpResponse::Ok().json(body))
}
