//! Brute-force lockout tracking.
//!
//! [`LoginAttemptTracker`] counts consecutive failed login attempts per
//! identity and refuses further attempts for a configurable window once the
//! threshold is reached. State lives in a concurrent map; the
//! read-modify-write in [`LoginAttemptTracker::record_failed_attempt`] is
//! atomic per identity via the DashMap entry API, so two concurrent failures
//! for the same identity can never under-count.
//!
//! Records self-heal: an elapsed lockout is treated as absent on every read
//! and is removed either opportunistically on lookup or by the periodic
//! sweep ([`LoginAttemptTracker::sweep_expired`]). Correctness never depends
//! on the sweep.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use time::OffsetDateTime;

use crate::clock::Clock;
use crate::config::LockoutConfig;

/// Per-identity failed-attempt state. Owned exclusively by the tracker.
#[derive(Debug, Clone, Default)]
struct AttemptRecord {
    attempts: u32,
    locked_until: Option<OffsetDateTime>,
}

impl AttemptRecord {
    fn is_locked(&self, now: OffsetDateTime) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    fn lockout_elapsed(&self, now: OffsetDateTime) -> bool {
        self.locked_until.is_some_and(|until| until <= now)
    }
}

/// Read-only snapshot of an identity's lockout state.
///
/// Derived on demand; never stored. An identity with no record yields
/// `{ attempts: 0, locked_until: None }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockoutInfo {
    /// The identity the snapshot is about.
    pub identity: String,
    /// Consecutive failed attempts recorded.
    pub attempts: u32,
    /// When the active lockout elapses, if one is in effect.
    pub locked_until: Option<OffsetDateTime>,
}

/// Tracks failed login attempts and enforces time-boxed lockouts.
pub struct LoginAttemptTracker {
    records: DashMap<String, AttemptRecord>,
    max_attempts: u32,
    lockout_duration: Duration,
    clock: Arc<dyn Clock>,
}

impl LoginAttemptTracker {
    /// Creates a tracker from the lockout configuration.
    #[must_use]
    pub fn new(config: &LockoutConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            max_attempts: config.max_failed_attempts,
            lockout_duration: config.lockout_duration,
            clock,
        }
    }

    /// Records a failed login attempt for `identity`.
    ///
    /// While the identity is locked this is a no-op on the counter: an
    /// in-flight lockout is never extended or re-triggered by further
    /// failures. A record whose lockout has elapsed is reset and the attempt
    /// counts into a fresh window. Reaching the threshold sets
    /// `locked_until = now + lockout_duration`.
    pub fn record_failed_attempt(&self, identity: &str) {
        let now = self.clock.now();
        let mut record = self
            .records
            .entry(identity.to_string())
            .or_insert_with(AttemptRecord::default);

        if record.is_locked(now) {
            return;
        }
        if record.lockout_elapsed(now) {
            *record = AttemptRecord::default();
        }
        record.attempts += 1;
        if record.attempts >= self.max_attempts {
            record.locked_until = Some(now + self.lockout_duration);
            tracing::warn!(
                identity,
                attempts = record.attempts,
                "identity locked out after repeated failures"
            );
        }
    }

    /// Removes the identity's record entirely.
    ///
    /// Called on successful authentication; a later failure starts counting
    /// from zero.
    pub fn clear_attempts(&self, identity: &str) {
        self.records.remove(identity);
    }

    /// Returns a snapshot of the identity's lockout state.
    ///
    /// Absence is a valid "never failed" state, not an error.
    #[must_use]
    pub fn lockout_info(&self, identity: &str) -> LockoutInfo {
        match self.records.get(identity) {
            Some(record) => LockoutInfo {
                identity: identity.to_string(),
                attempts: record.attempts,
                locked_until: record.locked_until,
            },
            None => LockoutInfo {
                identity: identity.to_string(),
                attempts: 0,
                locked_until: None,
            },
        }
    }

    /// Returns `true` iff the identity is currently locked.
    ///
    /// A record whose lockout has elapsed is removed on the way out, so
    /// identities that never retry do not accumulate.
    #[must_use]
    pub fn is_account_locked(&self, identity: &str) -> bool {
        let now = self.clock.now();
        let locked_until = match self.records.get(identity) {
            Some(record) => record.locked_until,
            None => return false,
        };

        match locked_until {
            Some(until) if until > now => true,
            Some(_) => {
                // Re-check under the entry lock: the record may have been
                // replaced by a concurrent failed attempt since the read.
                self.records
                    .remove_if(identity, |_, record| record.lockout_elapsed(now));
                false
            }
            None => false,
        }
    }

    /// Removes every record whose lockout has elapsed, returning the number
    /// removed.
    ///
    /// Run periodically (see [`crate::sweep`]); purely a memory bound.
    pub fn sweep_expired(&self) -> u64 {
        let now = self.clock.now();
        let mut removed = 0u64;
        self.records.retain(|_, record| {
            if record.lockout_elapsed(now) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of identities currently tracked (including elapsed records not
    /// yet swept).
    #[must_use]
    pub fn tracked_identities(&self) -> usize {
        self.records.len()
    }
}
