use actix_web::web;

use crate::constants::MAX_SUBMISSION_BYTES;

/// Body size limits for both accepted submission encodings.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(MAX_SUBMISSION_BYTES));
    cfg.app_data(web::FormConfig::default().limit(MAX_SUBMISSION_BYTES));
}
