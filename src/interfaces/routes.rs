use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod payload;
mod submit_form;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.configure(payload::config_routes);
    cfg.configure(submit_form::config_routes);
}
