//! # Rate Limit Module
//!
//! Sliding-window attempt limiter keyed by caller identity.
//!
//! ## Sliding Window
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  max_attempts = 3, window = 60s                                         │
//! │                                                                         │
//! │  t=0s   ✔ [0]                                                           │
//! │  t=10s  ✔ [0, 10]                                                       │
//! │  t=20s  ✔ [0, 10, 20]                                                   │
//! │  t=30s  ✘ [0, 10, 20]        3 attempts in the last 60s                 │
//! │  t=61s  ✔ [10, 20, 61]       t=0 has slid out of the window             │
//! │                                                                         │
//! │  The window trails "now"; there are no calendar-aligned buckets.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The attempt log is a `DashMap`. `is_allowed` prunes, counts and appends
//! while holding the entry guard for that identifier, so concurrent callers
//! on the same identifier cannot both slip in under the limit. Different
//! identifiers only contend when they hash to the same shard.
//!
//! ## Memory
//! Pruning is lazy: it happens when an identifier is checked. Identifiers
//! that stop calling keep their (stale) entry until [`RateLimiter::sweep`]
//! or [`RateLimiter::reset`] removes it. Hosts with many distinct callers
//! should sweep periodically.

use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::config::RateLimitConfig;
use crate::error::CoreResult;

/// Per-identifier sliding-window limiter.
///
/// Shareable across threads behind an `Arc`.
///
/// ## Example
/// ```rust
/// use fieldkit_core::rate_limit::RateLimiter;
///
/// let limiter = RateLimiter::from_millis(2, 60_000);
///
/// assert!(limiter.is_allowed("u"));
/// assert!(limiter.is_allowed("u"));
/// assert!(!limiter.is_allowed("u"));
///
/// // Other identifiers are independent
/// assert!(limiter.is_allowed("v"));
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: DashMap<String, VecDeque<Instant>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Creates a limiter on the system clock.
    ///
    /// A `max_attempts` of zero denies everything.
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self::with_clock(max_attempts, window, Arc::new(SystemClock))
    }

    /// Creates a limiter with the window given in milliseconds.
    pub fn from_millis(max_attempts: usize, window_ms: u64) -> Self {
        Self::new(max_attempts, Duration::from_millis(window_ms))
    }

    /// Creates a limiter on an injected clock.
    pub fn with_clock(max_attempts: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_attempts,
            window,
            attempts: DashMap::new(),
            clock,
        }
    }

    /// Creates a limiter from validated configuration.
    pub fn from_config(config: &RateLimitConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::new(config.max_attempts, config.window()))
    }

    /// Maximum admissions per window.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Records an attempt for `identifier` if it is under the limit.
    ///
    /// Returns `true` if the attempt is admitted (and recorded), `false` if
    /// `max_attempts` admissions already fall inside the trailing window.
    /// Denied attempts are not recorded, so a caller that keeps retrying is
    /// let back in as soon as its oldest admission expires.
    pub fn is_allowed(&self, identifier: &str) -> bool {
        let now = self.clock.now();
        let mut entry = self.attempts.entry(identifier.to_owned()).or_default();

        expire(&mut entry, now, self.window);

        if entry.len() >= self.max_attempts {
            debug!(
                identifier,
                attempts = entry.len(),
                max_attempts = self.max_attempts,
                "Rate limit exceeded"
            );
            return false;
        }

        entry.push_back(now);
        true
    }

    /// Admissions `identifier` has left in the current window.
    ///
    /// Read-only: does not record an attempt or prune the log.
    pub fn remaining(&self, identifier: &str) -> usize {
        let now = self.clock.now();
        let used = self
            .attempts
            .get(identifier)
            .map(|entry| {
                entry
                    .iter()
                    .filter(|&&t| !is_expired(t, now, self.window))
                    .count()
            })
            .unwrap_or(0);

        self.max_attempts.saturating_sub(used)
    }

    /// Forgets everything recorded for `identifier`.
    ///
    /// Returns `true` if the identifier was tracked.
    pub fn reset(&self, identifier: &str) -> bool {
        self.attempts.remove(identifier).is_some()
    }

    /// Prunes every identifier and drops those left with no attempts.
    ///
    /// Returns the number of identifiers removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let before = self.attempts.len();

        self.attempts.retain(|_, entry| {
            expire(entry, now, self.window);
            !entry.is_empty()
        });

        let evicted = before.saturating_sub(self.attempts.len());
        if evicted > 0 {
            debug!(evicted, remaining = self.attempts.len(), "Swept idle identifiers");
        }
        evicted
    }

    /// Number of identifiers currently held in the log.
    pub fn tracked_identifiers(&self) -> usize {
        self.attempts.len()
    }
}

/// An attempt expires once strictly more than `window` has elapsed.
fn is_expired(attempt: Instant, now: Instant, window: Duration) -> bool {
    now.saturating_duration_since(attempt) > window
}

/// Drops expired attempts from the front; the log is in arrival order.
fn expire(entry: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = entry.front() {
        if is_expired(oldest, now, window) {
            entry.pop_front();
        } else {
            break;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use std::thread;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn limiter(max: usize, window: Duration) -> (RateLimiter, MockClock) {
        init_tracing();
        let clock = MockClock::default();
        let limiter = RateLimiter::with_clock(max, window, Arc::new(clock.clone()));
        (limiter, clock)
    }

    #[test]
    fn test_two_allowed_then_denied() {
        let limiter = RateLimiter::from_millis(2, 60_000);
        assert!(limiter.is_allowed("u"));
        assert!(limiter.is_allowed("u"));
        assert!(!limiter.is_allowed("u"));
    }

    #[test]
    fn test_exactly_max_attempts_admitted() {
        let (limiter, _clock) = limiter(5, Duration::from_secs(60));

        for _ in 0..5 {
            assert!(limiter.is_allowed("farm-42"));
        }
        assert!(!limiter.is_allowed("farm-42"));
        assert!(!limiter.is_allowed("farm-42"));
    }

    #[test]
    fn test_window_slides() {
        let (limiter, clock) = limiter(2, Duration::from_secs(60));

        assert!(limiter.is_allowed("u")); // t=0
        clock.advance(Duration::from_secs(30));
        assert!(limiter.is_allowed("u")); // t=30
        assert!(!limiter.is_allowed("u"));

        // t=60: first attempt is exactly window old, still counts
        clock.advance(Duration::from_secs(30));
        assert!(!limiter.is_allowed("u"));

        // t=61: first attempt has expired, second has not
        clock.advance(Duration::from_secs(1));
        assert!(limiter.is_allowed("u"));
        assert!(!limiter.is_allowed("u"));

        // t=91: second attempt expired
        clock.advance(Duration::from_secs(30));
        assert!(limiter.is_allowed("u"));
    }

    #[test]
    fn test_allowed_again_after_window() {
        let (limiter, clock) = limiter(3, Duration::from_millis(500));
        for _ in 0..3 {
            assert!(limiter.is_allowed("ip:10.0.0.1"));
        }
        assert!(!limiter.is_allowed("ip:10.0.0.1"));

        clock.advance(Duration::from_millis(501));
        assert!(limiter.is_allowed("ip:10.0.0.1"));
    }

    #[test]
    fn test_identifiers_are_independent() {
        let (limiter, _clock) = limiter(1, Duration::from_secs(60));
        assert!(limiter.is_allowed("alice"));
        assert!(!limiter.is_allowed("alice"));
        assert!(limiter.is_allowed("bob"));
    }

    #[test]
    fn test_zero_max_denies_everything() {
        let (limiter, _clock) = limiter(0, Duration::from_secs(60));
        assert!(!limiter.is_allowed("u"));
        assert_eq!(limiter.remaining("u"), 0);
    }

    #[test]
    fn test_remaining_is_read_only() {
        let (limiter, clock) = limiter(3, Duration::from_secs(10));
        assert_eq!(limiter.remaining("u"), 3);

        limiter.is_allowed("u");
        assert_eq!(limiter.remaining("u"), 2);
        assert_eq!(limiter.remaining("u"), 2);

        clock.advance(Duration::from_secs(11));
        assert_eq!(limiter.remaining("u"), 3);
    }

    #[test]
    fn test_reset_forgets_identifier() {
        let (limiter, _clock) = limiter(1, Duration::from_secs(60));
        assert!(limiter.is_allowed("u"));
        assert!(!limiter.is_allowed("u"));

        assert!(limiter.reset("u"));
        assert!(!limiter.reset("u"));
        assert!(limiter.is_allowed("u"));
    }

    #[test]
    fn test_sweep_evicts_idle_identifiers() {
        let (limiter, clock) = limiter(2, Duration::from_secs(60));
        limiter.is_allowed("old");
        clock.advance(Duration::from_secs(45));
        limiter.is_allowed("recent");
        assert_eq!(limiter.tracked_identifiers(), 2);

        // Lazy pruning alone never removes identifiers
        clock.advance(Duration::from_secs(30));
        assert_eq!(limiter.tracked_identifiers(), 2);

        assert_eq!(limiter.sweep(), 1);
        assert_eq!(limiter.tracked_identifiers(), 1);
        assert_eq!(limiter.remaining("recent"), 1);
    }

    #[test]
    fn test_from_config() {
        let config = RateLimitConfig {
            max_attempts: 4,
            window_ms: 2_000,
        };
        let limiter = RateLimiter::from_config(&config).unwrap();
        assert_eq!(limiter.max_attempts(), 4);
        assert_eq!(limiter.window(), Duration::from_secs(2));

        let bad = RateLimitConfig {
            max_attempts: 0,
            window_ms: 2_000,
        };
        assert!(RateLimiter::from_config(&bad).is_err());
    }

    #[test]
    fn test_concurrent_callers_never_exceed_limit() {
        let (limiter, _clock) = limiter(10, Duration::from_secs(60));
        let limiter = Arc::new(limiter);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || (0..50).filter(|_| limiter.is_allowed("shared")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 10);
    }
}
