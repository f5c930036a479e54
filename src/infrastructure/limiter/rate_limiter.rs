use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 5,
        }
    }
}

/// Request count for one client key in its current fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientWindow {
    pub count: u32,
    pub window_start: Instant,
}

impl ClientWindow {
    fn new(now: Instant) -> Self {
        Self { count: 0, window_start: now }
    }

    /// Strictly greater than: a request exactly `window` after the start is
    /// still inside the old window.
    fn is_expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }

    fn reset(&mut self, now: Instant) {
        self.count = 0;
        self.window_start = now;
    }

    fn retry_after(&self, now: Instant, window: Duration) -> Duration {
        window.saturating_sub(now.saturating_duration_since(self.window_start))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Denied { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Fixed-window counter keyed by client.
///
/// Denied requests still increment the count, so a client over the limit
/// stays denied until its window resets.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, ClientWindow>>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    pub fn allow(&self, client_key: &str, now: Instant) -> bool {
        self.check(client_key, now).is_allowed()
    }

    /// Records one request for `client_key` and decides whether it passes.
    ///
    /// The shard guard is held across reset, increment and compare, so two
    /// concurrent requests for the same key cannot both see a free slot.
    pub fn check(&self, client_key: &str, now: Instant) -> RateDecision {
        if let Some(mut window) = self.windows.get_mut(client_key) {
            return self.record(&mut window, now);
        }

        let mut window = self
            .windows
            .entry(client_key.to_string())
            .or_insert_with(|| ClientWindow::new(now));
        self.record(&mut window, now)
    }

    fn record(&self, window: &mut ClientWindow, now: Instant) -> RateDecision {
        if window.is_expired(now, self.policy.window) {
            window.reset(now);
        }

        window.count = window.count.saturating_add(1);

        if window.count <= self.policy.max_requests {
            RateDecision::Allowed {
                remaining: self.policy.max_requests - window.count,
            }
        } else {
            RateDecision::Denied {
                retry_after: window.retry_after(now, self.policy.window),
            }
        }
    }

    /// Current window for a client, if one has been opened.
    pub fn window(&self, client_key: &str) -> Option<ClientWindow> {
        self.windows.get(client_key).map(|w| *w)
    }

    /// Drops windows whose duration has fully elapsed. Such windows would be
    /// reset on the client's next request anyway, so removal changes no decision.
    pub fn evict_expired(&self, now: Instant) -> usize {
        let window = self.policy.window;
        let mut evicted = 0;
        self.windows.retain(|_, w| {
            let keep = !w.is_expired(now, window);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitPolicy::default())
    }
}
