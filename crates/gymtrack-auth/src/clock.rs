//! Injectable time source.
//!
//! Every expiry comparison in this crate (lockouts, token lifetimes,
//! revocation entries) goes through a [`Clock`] rather than calling
//! `OffsetDateTime::now_utc()` directly. This keeps time-based behavior
//! deterministic in tests: advance a [`ManualClock`] instead of sleeping.

use std::sync::Mutex;
use std::time::Duration;

use time::OffsetDateTime;

/// A source of the current instant.
///
/// Implementations must be cheap to call; `now()` is invoked on every
/// lockout check and token validation.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> OffsetDateTime;
}

/// Production clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A manually controlled clock for deterministic tests.
///
/// The clock only moves when told to, so expiry boundaries can be tested
/// exactly ("at `expires_at`" vs "one second after") without sleeping.
///
/// ```ignore
/// let clock = Arc::new(ManualClock::new(datetime!(2026-01-01 00:00:00 UTC)));
/// clock.advance(Duration::from_secs(301));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock to an absolute instant.
    pub fn set(&self, to: OffsetDateTime) {
        *self.now.lock().unwrap() = to;
    }

    /// Advances the clock by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}
