//! # Clock Module
//!
//! Time source for the rate limiter.
//!
//! Production code uses [`SystemClock`]. Tests inject [`MockClock`] to step
//! through a window without sleeping. `MockClock` is compiled for this
//! crate's own tests and, for downstream crates, behind the `test-helpers`
//! feature:
//!
//! ```toml
//! [dev-dependencies]
//! fieldkit-core = { path = "../fieldkit-core", features = ["test-helpers"] }
//! ```

use std::fmt::Debug;
use std::time::Instant;

/// Source of the current instant.
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Monotonic system clock (`Instant::now()`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub use mock::MockClock;

#[cfg(any(test, feature = "test-helpers"))]
mod mock {
    use super::Clock;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// Manually advanced clock.
    ///
    /// Clones share the same time value, so a test can hand one clone to a
    /// limiter and keep another to move time forward.
    #[derive(Debug, Clone)]
    pub struct MockClock {
        current: Arc<Mutex<Instant>>,
    }

    impl MockClock {
        /// Create a mock clock starting at `start`.
        pub fn new(start: Instant) -> Self {
            Self {
                current: Arc::new(Mutex::new(start)),
            }
        }

        /// Move the clock forward.
        pub fn advance(&self, by: Duration) {
            let mut now = self
                .current
                .lock()
                .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
            *now += by;
        }
    }

    impl Default for MockClock {
        fn default() -> Self {
            Self::new(Instant::now())
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> Instant {
            *self
                .current
                .lock()
                .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_mock_clock_clones_share_time() {
        let start = Instant::now();
        let clock = MockClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::from_millis(1500));

        assert_eq!(clock.now(), start + Duration::from_millis(1500));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let t1 = clock.now();
        let t2 = clock.now();
        assert!(t2 >= t1);
    }
}
