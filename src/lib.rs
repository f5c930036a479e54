use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, routes};
pub use infrastructure::{limiter, mail, templates, utils};

use limiter::rate_limiter::RateLimiter;
use mail::sender::MailSender;
use templates::store::TemplateStore;
use use_cases::{dispatcher::MailDispatcher, submission::SubmissionController};

pub struct AppState {
    pub contact_handler: SubmissionController,
    pub trust_x_forwarded_for: bool,
    pub redirect_url: String,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        sender: Arc<dyn MailSender>,
        templates: Arc<dyn TemplateStore>,
    ) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_policy());
        let dispatcher = MailDispatcher::new(sender, templates, config.mail_settings());

        AppState {
            contact_handler: SubmissionController::new(limiter, dispatcher),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
            redirect_url: config.redirect_url.clone(),
        }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.contact_handler.limiter
    }
}
