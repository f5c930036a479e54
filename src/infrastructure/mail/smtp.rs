use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use zeroize::Zeroizing;

use crate::{
    entities::message::OutboundMessage,
    errors::MailError,
    mail::sender::MailSender,
    settings::AppConfig,
};

/// `MailSender` backed by an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailSender {
    pub fn new(
        relay: &str,
        username: &str,
        password: &Zeroizing<String>,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let credentials = Credentials::new(username.to_string(), password.as_str().to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .credentials(credentials)
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, MailError> {
        Self::new(
            &config.smtp_relay,
            &config.smtp_username,
            &config.smtp_password,
            Duration::from_secs(config.mail_send_timeout_secs),
        )
    }

    /// Checks that the relay accepts a connection. Only used at startup for logging.
    pub async fn test_connection(&self) -> Result<bool, MailError> {
        self.transport
            .test_connection()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

fn build_message(message: OutboundMessage) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(mailbox(&message.from)?)
        .to(mailbox(&message.to)?)
        .subject(message.subject)
        .header(ContentType::TEXT_HTML);

    // An unparseable Reply-To is dropped; the message still goes out.
    if let Some(reply_to) = &message.reply_to {
        match mailbox(reply_to) {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => tracing::warn!("Dropping Reply-To header: {}", e),
        }
    }

    builder
        .body(message.html_body)
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl MailSender for SmtpMailSender {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError> {
        let email = build_message(message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        tracing::debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(reply_to: Option<&str>) -> OutboundMessage {
        OutboundMessage {
            from: "site@example.com".into(),
            to: "owner@example.com".into(),
            subject: "New Contact Form Submission: Web".into(),
            html_body: "<p>Hello</p>".into(),
            reply_to: reply_to.map(str::to_string),
        }
    }

    #[test]
    fn builds_html_message_with_reply_to() {
        let email = build_message(message(Some("jo@example.com"))).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(raw.contains("Reply-To: jo@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("Subject: New Contact Form Submission: Web"));
    }

    #[test]
    fn unparseable_reply_to_is_dropped_not_fatal() {
        for address in ["jo.@x.co", "a..b@x.co", "jo,x@y.co", "(jo)@x.co", "jo@-x.co"] {
            let email = build_message(message(Some(address)))
                .unwrap_or_else(|e| panic!("{address}: {e}"));
            let raw = String::from_utf8(email.formatted()).unwrap();

            assert!(!raw.contains("Reply-To"), "{address}");
            assert!(raw.contains("To: owner@example.com"), "{address}");
        }
    }

    #[test]
    fn rejects_unparseable_recipient() {
        let mut msg = message(None);
        msg.to = "not an address".into();

        assert!(matches!(build_message(msg), Err(MailError::InvalidAddress(_))));
    }
}
