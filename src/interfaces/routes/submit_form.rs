use actix_web::web;

use crate::handlers::submit_form;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/submit-form")
            .route(web::get().to(submit_form::redirect_to_site))
            .route(web::post().to(submit_form::submit_form))
    );
}
