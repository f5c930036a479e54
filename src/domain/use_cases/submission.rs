use std::time::Instant;

use crate::{
    entities::submission::{SubmissionOutcome, SubmissionRequest},
    limiter::rate_limiter::{RateDecision, RateLimiter},
    use_cases::{dispatcher::MailDispatcher, validator::validate_submission},
};

/// Runs a submission through rate limiting, validation and mail dispatch.
/// Each call ends in exactly one `SubmissionOutcome`; nothing is retried.
#[derive(Clone)]
pub struct SubmissionController {
    pub limiter: RateLimiter,
    pub dispatcher: MailDispatcher,
}

impl SubmissionController {
    pub fn new(limiter: RateLimiter, dispatcher: MailDispatcher) -> Self {
        SubmissionController { limiter, dispatcher }
    }

    pub async fn submit(
        &self,
        client_key: &str,
        request: SubmissionRequest,
        now: Instant,
    ) -> SubmissionOutcome {
        if let RateDecision::Denied { retry_after } = self.limiter.check(client_key, now) {
            tracing::warn!(client = %client_key, ?retry_after, "Form submission rate limited");
            return SubmissionOutcome::RateLimited { retry_after };
        }

        if let Err(reason) = validate_submission(&request) {
            tracing::info!(client = %client_key, %reason, "Form submission rejected");
            return SubmissionOutcome::ValidationFailed(reason);
        }

        match self.dispatcher.dispatch_submission(&request).await {
            Ok(()) => {
                tracing::info!(client = %client_key, project = %request.project, "Form submission dispatched");
                SubmissionOutcome::Accepted
            }
            Err(e) => {
                tracing::error!(client = %client_key, stage = %e.stage, "Form submission error: {}", e);
                SubmissionOutcome::DispatchFailed
            }
        }
    }
}
