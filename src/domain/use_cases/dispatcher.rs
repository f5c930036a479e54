use std::sync::Arc;

use tokio::time::timeout;

use crate::{
    entities::{message::OutboundMessage, submission::SubmissionRequest},
    errors::{DispatchError, DispatchStage, MailError},
    mail::sender::MailSender,
    settings::MailSettings,
    templates::{
        renderer::{render, TemplateValues},
        store::{TemplateStore, CONFIRMATION, OWNER_NOTIFICATION},
    },
};

pub const CONFIRMATION_SUBJECT: &str = "Thank you for your inquiry";

pub fn notification_subject(project: &str) -> String {
    format!("New Contact Form Submission: {project}")
}

/// Sends the owner notification, then the submitter confirmation.
///
/// The two sends are strictly sequential and not transactional: if the
/// confirmation fails, the notification has still gone out.
#[derive(Clone)]
pub struct MailDispatcher {
    pub sender: Arc<dyn MailSender>,
    pub templates: Arc<dyn TemplateStore>,
    pub settings: MailSettings,
}

impl MailDispatcher {
    pub fn new(
        sender: Arc<dyn MailSender>,
        templates: Arc<dyn TemplateStore>,
        settings: MailSettings,
    ) -> Self {
        MailDispatcher { sender, templates, settings }
    }

    pub async fn dispatch_submission(&self, request: &SubmissionRequest) -> Result<(), DispatchError> {
        let values = TemplateValues::from(request);

        let notification = self
            .compose(DispatchStage::OwnerNotification, OWNER_NOTIFICATION, &values, |html_body| OutboundMessage {
                from: self.settings.from.clone(),
                to: self.settings.owner.clone(),
                subject: notification_subject(&request.project),
                html_body,
                reply_to: Some(request.email.clone()),
            })
            .await?;
        self.deliver(DispatchStage::OwnerNotification, notification).await?;

        let confirmation = self
            .compose(DispatchStage::Confirmation, CONFIRMATION, &values, |html_body| OutboundMessage {
                from: self.settings.from.clone(),
                to: request.email.clone(),
                subject: CONFIRMATION_SUBJECT.to_string(),
                html_body,
                reply_to: None,
            })
            .await?;
        self.deliver(DispatchStage::Confirmation, confirmation).await
    }

    async fn compose(
        &self,
        stage: DispatchStage,
        template: &str,
        values: &TemplateValues,
        build: impl FnOnce(String) -> OutboundMessage,
    ) -> Result<OutboundMessage, DispatchError> {
        let source = self
            .templates
            .load(template)
            .await
            .map_err(|e| DispatchError::template(stage, e))?;

        Ok(build(render(&source, values)))
    }

    async fn deliver(&self, stage: DispatchStage, message: OutboundMessage) -> Result<(), DispatchError> {
        let limit = self.settings.send_timeout;

        match timeout(limit, self.sender.send(message)).await {
            Ok(Ok(())) => {
                tracing::debug!(%stage, "Mail sent");
                Ok(())
            }
            Ok(Err(e)) => Err(DispatchError::mail(stage, e)),
            Err(_) => Err(DispatchError::mail(stage, MailError::Timeout(limit))),
        }
    }
}
