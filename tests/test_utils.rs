#![allow(dead_code)]

use std::{
    net::TcpListener,
    sync::{Arc, Mutex},
    time::Duration,
};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use async_trait::async_trait;
use contact_form_backend::{
    entities::{message::OutboundMessage, submission::SubmissionRequest},
    errors::{MailError, TemplateError},
    mail::sender::MailSender,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment, MailSettings},
    templates::store::{FsTemplateStore, TemplateStore},
    AppState,
};
use mockall::mock;
use reqwest::{redirect::Policy, Client};
use zeroize::Zeroizing;

pub const OWNER: &str = "owner@example.com";
pub const SENDER: &str = "site@example.com";

mock! {
    pub Sender {}

    #[async_trait]
    impl MailSender for Sender {
        async fn send(&self, message: OutboundMessage) -> Result<(), MailError>;
    }
}

mock! {
    pub Templates {}

    #[async_trait]
    impl TemplateStore for Templates {
        async fn load(&self, name: &str) -> Result<String, TemplateError>;
    }
}

/// Records every message and fails the n-th send (1-based) when asked to.
#[derive(Clone, Default)]
pub struct RecordingMailSender {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    attempts: Arc<Mutex<usize>>,
    fail_on_attempt: Option<usize>,
}

impl RecordingMailSender {
    pub fn failing_on(attempt: usize) -> Self {
        RecordingMailSender {
            fail_on_attempt: Some(attempt),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl MailSender for RecordingMailSender {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };

        if self.fail_on_attempt == Some(attempt) {
            return Err(MailError::Transport("535 authentication rejected".into()));
        }

        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Contact Form Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        cors_allowed_origins: vec!["*".to_string()],
        rate_limit_window_secs: 15 * 60,
        rate_limit_max_requests: 5,
        rate_limit_sweep_interval_secs: 60,
        trust_x_forwarded_for: true,
        owner_email: OWNER.to_string(),
        sender_email: SENDER.to_string(),
        smtp_relay: "smtp.example.com".to_string(),
        smtp_username: SENDER.to_string(),
        smtp_password: Zeroizing::new("app-password".to_string()),
        mail_send_timeout_secs: 5,
        template_dir: None,
        redirect_url: "https://example.com/video-editor".to_string(),
    }
}

pub fn mail_settings() -> MailSettings {
    MailSettings {
        from: SENDER.to_string(),
        owner: OWNER.to_string(),
        send_timeout: Duration::from_secs(5),
    }
}

pub fn valid_request() -> SubmissionRequest {
    SubmissionRequest::new("Jo", "jo@example.com", "Web", "line1\nline2")
}

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub state: web::Data<AppState>,
    pub mailer: RecordingMailSender,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(RecordingMailSender::default(), test_config()).await
    }

    pub async fn spawn_with(mailer: RecordingMailSender, config: AppConfig) -> Self {
        let state = web::Data::new(AppState::new(
            &config,
            Arc::new(mailer.clone()),
            Arc::new(FsTemplateStore::embedded()),
        ));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state_clone.clone())
                .wrap(NormalizePath::trim())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(1)
        .run();

        actix_rt::spawn(server);

        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap();

        while client.get(format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self { address, client, state, mailer }
    }

    pub async fn post_json(&self, client_ip: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/submit-form", self.address))
            .header("x-forwarded-for", client_ip)
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_form(&self, client_ip: &str, fields: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(format!("{}/submit-form", self.address))
            .header("x-forwarded-for", client_ip)
            .form(fields)
            .send()
            .await
            .unwrap()
    }
}
