use std::time::Instant;

use tokio::time::{interval, Duration};

use crate::limiter::rate_limiter::RateLimiter;

/// Periodically drops expired rate-limit windows so the table stays bounded
/// by the number of clients seen within one window.
pub async fn start_eviction_task(limiter: RateLimiter, every: Duration) {
    let mut interval = interval(every);

    loop {
        interval.tick().await;

        let evicted = limiter.evict_expired(Instant::now());
        if evicted > 0 {
            tracing::debug!(
                "Evicted {} expired rate-limit windows, {} still tracked",
                evicted,
                limiter.tracked_clients()
            );
        }
    }
}
