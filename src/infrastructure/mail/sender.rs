use async_trait::async_trait;

use crate::{entities::message::OutboundMessage, errors::MailError};

/// Hands a composed message to a mail transport.
///
/// Callers treat every error the same way; the variant only matters for logs.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<(), MailError>;
}
