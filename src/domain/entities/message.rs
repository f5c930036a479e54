/// A composed email, ready to hand to a `MailSender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub reply_to: Option<String>,
}
