//! Per-key rate limiting
//!
//! Fixed-window counting: the window opens at a key's first request and
//! expires a fixed interval later, at which point the next request opens a
//! fresh window. This is not a sliding window, so a caller can burst up to
//! twice the limit across a window boundary.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::warn;

/// What to do when the counter store itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Allow the request when the counter state is unavailable
    FailOpen,
    /// Deny the request when the counter state is unavailable
    #[default]
    FailClosed,
}

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub limit: u32,
    /// Window length, measured from the first request in the window
    pub window: Duration,
    /// Behavior on counter-store failure
    pub failure_policy: FailurePolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            window: Duration::from_secs(3600),
            failure_policy: FailurePolicy::FailClosed,
        }
    }
}

impl RateLimitConfig {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// Result of a rate limit check
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Remaining requests in the current window after this decision
    pub remaining: u32,
    /// Configured limit per window
    pub limit: u32,
}

/// Per-key counting window
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    started_at: Instant,
}

/// Fixed-window rate limiter over an in-process counter map
///
/// Counters are ephemeral by design; they are not part of durable history
/// and restart empty.
#[derive(Debug)]
pub struct RateLimiter {
    windows: RwLock<HashMap<String, Window>>,
    config: RateLimitConfig,
    cleanup_interval: Duration,
    last_cleanup: RwLock<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            config,
            cleanup_interval: Duration::from_secs(300),
            last_cleanup: RwLock::new(Instant::now()),
        }
    }

    /// Configured per-window limit
    pub fn limit(&self) -> u32 {
        self.config.limit
    }

    /// Check whether a request for the key is allowed, counting it if so
    ///
    /// Denied requests do not consume quota.
    pub fn check_and_increment(&self, key_id: &str) -> RateLimitDecision {
        self.maybe_cleanup();

        let now = Instant::now();
        let mut windows = match self.windows.write() {
            Ok(guard) => guard,
            Err(e) => return self.decide_on_failure(&e.to_string()),
        };

        let window = windows
            .get(key_id)
            .copied()
            .filter(|w| now.duration_since(w.started_at) < self.config.window);

        match window {
            None => {
                // First request opens a fresh window anchored at now
                windows.insert(
                    key_id.to_string(),
                    Window {
                        count: 1,
                        started_at: now,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    remaining: self.config.limit.saturating_sub(1),
                    limit: self.config.limit,
                }
            }
            Some(w) if w.count >= self.config.limit => RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit: self.config.limit,
            },
            Some(w) => {
                windows.insert(
                    key_id.to_string(),
                    Window {
                        count: w.count + 1,
                        started_at: w.started_at,
                    },
                );
                RateLimitDecision {
                    allowed: true,
                    remaining: self.config.limit.saturating_sub(w.count + 1),
                    limit: self.config.limit,
                }
            }
        }
    }

    /// Remaining quota in the key's current window, without consuming any
    ///
    /// Repeated calls without an intervening `check_and_increment` return
    /// the same value.
    pub fn remaining(&self, key_id: &str) -> u32 {
        let now = Instant::now();
        let windows = match self.windows.read() {
            Ok(guard) => guard,
            Err(e) => {
                return match self.decide_on_failure(&e.to_string()) {
                    d if d.allowed => d.remaining,
                    _ => 0,
                }
            }
        };

        match windows
            .get(key_id)
            .filter(|w| now.duration_since(w.started_at) < self.config.window)
        {
            Some(w) => self.config.limit.saturating_sub(w.count),
            None => self.config.limit,
        }
    }

    /// Clear the key's window immediately (administrative override)
    pub fn reset(&self, key_id: &str) {
        if let Ok(mut windows) = self.windows.write() {
            windows.remove(key_id);
        }
    }

    fn decide_on_failure(&self, error: &str) -> RateLimitDecision {
        warn!(error = %error, policy = ?self.config.failure_policy, "Rate counter store unavailable");

        match self.config.failure_policy {
            FailurePolicy::FailOpen => RateLimitDecision {
                allowed: true,
                remaining: self.config.limit,
                limit: self.config.limit,
            },
            FailurePolicy::FailClosed => RateLimitDecision {
                allowed: false,
                remaining: 0,
                limit: self.config.limit,
            },
        }
    }

    /// Drop expired windows so idle keys don't accumulate forever
    fn maybe_cleanup(&self) {
        let due = match self.last_cleanup.read() {
            Ok(last) => last.elapsed() >= self.cleanup_interval,
            Err(_) => false,
        };

        if !due {
            return;
        }

        if let Ok(mut last) = self.last_cleanup.write() {
            *last = Instant::now();
        }

        let now = Instant::now();
        if let Ok(mut windows) = self.windows.write() {
            windows.retain(|_, w| now.duration_since(w.started_at) < self.config.window);
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(limit: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig::default().with_limit(limit))
    }

    #[test]
    fn test_first_request_allowed() {
        let limiter = limiter(10);

        let decision = limiter.check_and_increment("key-1");

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 9);
        assert_eq!(decision.limit, 10);
    }

    #[test]
    fn test_blocks_over_limit_without_consuming() {
        let limiter = limiter(2);

        assert!(limiter.check_and_increment("key-1").allowed);
        assert!(limiter.check_and_increment("key-1").allowed);

        let denied = limiter.check_and_increment("key-1");
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);

        // The denied request did not increment; remaining stays at zero
        // rather than going conceptually negative
        assert_eq!(limiter.remaining("key-1"), 0);
    }

    #[test]
    fn test_nth_request_boundary() {
        let limiter = limiter(5);

        for _ in 0..5 {
            assert!(limiter.check_and_increment("key-1").allowed);
        }
        assert!(!limiter.check_and_increment("key-1").allowed);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = limiter(1);

        assert!(limiter.check_and_increment("key-1").allowed);
        assert!(!limiter.check_and_increment("key-1").allowed);
        assert!(limiter.check_and_increment("key-2").allowed);
    }

    #[test]
    fn test_remaining_is_idempotent() {
        let limiter = limiter(10);
        limiter.check_and_increment("key-1");

        assert_eq!(limiter.remaining("key-1"), 9);
        assert_eq!(limiter.remaining("key-1"), 9);
        assert_eq!(limiter.remaining("key-1"), 9);
    }

    #[test]
    fn test_remaining_for_unseen_key_is_full_quota() {
        let limiter = limiter(100);
        assert_eq!(limiter.remaining("never-seen"), 100);
    }

    #[test]
    fn test_reset_clears_window() {
        let limiter = limiter(1);

        assert!(limiter.check_and_increment("key-1").allowed);
        assert!(!limiter.check_and_increment("key-1").allowed);

        limiter.reset("key-1");

        assert!(limiter.check_and_increment("key-1").allowed);
    }

    #[test]
    fn test_window_expiry_opens_fresh_window() {
        let limiter = RateLimiter::new(
            RateLimitConfig::default()
                .with_limit(2)
                .with_window(Duration::from_millis(50)),
        );

        assert!(limiter.check_and_increment("key-1").allowed);
        assert!(limiter.check_and_increment("key-1").allowed);
        assert!(!limiter.check_and_increment("key-1").allowed);

        std::thread::sleep(Duration::from_millis(60));

        // Window expired; the next request is the first of a new window
        let decision = limiter.check_and_increment("key-1");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
    }

    #[test]
    fn test_window_anchored_to_first_request() {
        let limiter = RateLimiter::new(
            RateLimitConfig::default()
                .with_limit(2)
                .with_window(Duration::from_millis(80)),
        );

        assert!(limiter.check_and_increment("key-1").allowed);
        std::thread::sleep(Duration::from_millis(50));

        // Still inside the window opened by the first request
        assert!(limiter.check_and_increment("key-1").allowed);
        assert!(!limiter.check_and_increment("key-1").allowed);

        std::thread::sleep(Duration::from_millis(40));

        // Now past the anchor + window, quota is fresh
        assert_eq!(limiter.remaining("key-1"), 2);
    }
}
