//! Bounded retry for rate-limited requests.
//!
//! Only HTTP 429 is retried. The wait honours the server's `Retry-After`
//! header (seconds) and falls back to a fixed default when the header is
//! missing or unparseable. Every wait is capped, and the number of attempts
//! is bounded, so a misbehaving server cannot stall a run forever.
//!
//! ```text
//! attempt 1 ── 429 ──> sleep(Retry-After | 10s, max 60s)
//! attempt 2 ── 429 ──> sleep(...)
//! attempt 3 ── 429 ──> RateLimited error
//! ```

use std::time::Duration;

/// Retry policy for 429 responses.
///
/// # Fields
///
/// * `max_attempts` - Total attempts including the first (default: 3)
/// * `default_retry_after` - Wait when `Retry-After` is absent (default: 10s)
/// * `max_delay` - Upper bound on a single wait (default: 60s)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: u32,
    pub default_retry_after: Duration,
    pub max_delay: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            default_retry_after: Duration::from_secs(10),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RateLimitPolicy {
    pub fn new(max_attempts: u32, default_retry_after: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            default_retry_after,
            max_delay,
        }
    }

    /// Whether another attempt may follow attempt number `attempt` (1-based).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Wait before the next attempt, given the raw `Retry-After` header.
    ///
    /// Only the delta-seconds form is understood; an HTTP-date falls back to
    /// the default.
    pub fn delay(&self, retry_after: Option<&str>) -> Duration {
        let requested = retry_after
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(self.default_retry_after);
        requested.min(self.max_delay)
    }
}
