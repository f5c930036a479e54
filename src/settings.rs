use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use url::Url;
use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};
use zeroize::Zeroizing;

use crate::{infrastructure::limiter::rate_limiter::RateLimitPolicy, use_cases::validator::is_valid_email};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_max_requests")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_sweep_interval")]
    pub rate_limit_sweep_interval_secs: u64,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default)]
    pub owner_email: String,

    #[serde(default)]
    pub sender_email: String,

    #[serde(default = "default_smtp_relay")]
    pub smtp_relay: String,

    #[serde(default)]
    pub smtp_username: String,

    #[serde(default)]
    pub smtp_password: Zeroizing<String>,

    #[serde(default = "default_send_timeout")]
    pub mail_send_timeout_secs: u64,

    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    #[serde(default = "default_redirect_url")]
    pub redirect_url: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Contact-Form-API".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_window_secs() -> u64 {
    15 * 60
}
fn default_max_requests() -> u32 {
    5
}
fn default_sweep_interval() -> u64 {
    60
}
fn default_smtp_relay() -> String {
    "smtp.gmail.com".to_string()
}
fn default_send_timeout() -> u64 {
    30
}
fn default_redirect_url() -> String {
    "https://nobleosinachi.github.io/video-editor".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        if config.smtp_username.trim().is_empty() {
            config.smtp_username = config.sender_email.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !is_valid_email(&self.owner_email) {
            errors.push("OWNER_EMAIL must be a valid email address");
        }
        if !is_valid_email(&self.sender_email) {
            errors.push("SENDER_EMAIL must be a valid email address");
        }
        if self.smtp_password.trim().is_empty() {
            errors.push("SMTP_PASSWORD must be set");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than zero");
        }
        if Url::parse(&self.redirect_url).is_err() {
            errors.push("REDIRECT_URL must be an absolute URL");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            window: Duration::from_secs(self.rate_limit_window_secs),
            max_requests: self.rate_limit_max_requests,
        }
    }

    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            from: self.sender_email.clone(),
            owner: self.owner_email.clone(),
            send_timeout: Duration::from_secs(self.mail_send_timeout_secs),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_interval_secs.max(1))
    }
}

/// Addresses and limits the mail dispatcher works with.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub owner: String,
    pub send_timeout: Duration,
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_sweep_interval_secs", &self.rate_limit_sweep_interval_secs)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("owner_email", &self.owner_email)
            .field("sender_email", &self.sender_email)
            .field("smtp_relay", &self.smtp_relay)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &self.smtp_password.as_str().redact())
            .field("mail_send_timeout_secs", &self.mail_send_timeout_secs)
            .field("template_dir", &self.template_dir)
            .field("redirect_url", &self.redirect_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Development,
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: 1,
            cors_allowed_origins: vec!["https://a.example, https://b.example".to_string()],
            rate_limit_window_secs: default_window_secs(),
            rate_limit_max_requests: default_max_requests(),
            rate_limit_sweep_interval_secs: default_sweep_interval(),
            trust_x_forwarded_for: false,
            owner_email: "owner@example.com".to_string(),
            sender_email: "site@example.com".to_string(),
            smtp_relay: default_smtp_relay(),
            smtp_username: "site@example.com".to_string(),
            smtp_password: Zeroizing::new("app-password".to_string()),
            mail_send_timeout_secs: default_send_timeout(),
            template_dir: None,
            redirect_url: default_redirect_url(),
        }
    }

    #[test]
    fn defaults_match_reference_limits() {
        let policy = config().rate_limit_policy();

        assert_eq!(policy.window, Duration::from_secs(900));
        assert_eq!(policy.max_requests, 5);
    }

    #[test]
    fn splits_comma_separated_origins() {
        assert_eq!(
            config().cors_origins(),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn collects_every_validation_problem() {
        let mut cfg = config();
        cfg.owner_email = "nobody".to_string();
        cfg.smtp_password = Zeroizing::new(String::new());
        cfg.rate_limit_max_requests = 0;

        let message = cfg.validate().unwrap_err().to_string();

        assert!(message.contains("OWNER_EMAIL"));
        assert!(message.contains("SMTP_PASSWORD"));
        assert!(message.contains("RATE_LIMIT_MAX_REQUESTS"));
    }

    #[test]
    fn rejects_wildcard_cors_in_production() {
        let mut cfg = config();
        cfg.env = AppEnvironment::Production;
        cfg.cors_allowed_origins = vec!["*".to_string()];

        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", config());

        assert!(!rendered.contains("app-password"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
