//! Periodic sweeps for the in-memory stores.
//!
//! Both the lockout tracker and the revocation store already drop stale
//! entries lazily on lookup; these tasks bound memory for entries that are
//! never looked up again. Each sweep holds a lock only for the duration of
//! a single entry removal, so request threads are never stalled behind it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

use crate::config::SweepConfig;
use crate::lockout::LoginAttemptTracker;
use crate::revocation::TokenRevocationStore;

/// Spawns a task that periodically purges elapsed lockout records.
///
/// The handle can be aborted on shutdown; the loop itself never ends.
pub fn spawn_lockout_sweeper(
    tracker: Arc<LoginAttemptTracker>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        // The first tick fires immediately; skip it so the sweep starts one
        // full interval after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = tracker.sweep_expired();
            if removed > 0 {
                debug!(removed, "swept expired lockout records");
            }
        }
    })
}

/// Spawns a task that periodically purges expired revocation entries.
pub fn spawn_revocation_sweeper(
    store: Arc<TokenRevocationStore>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.sweep_expired();
            if removed > 0 {
                debug!(removed, "swept expired revocation entries");
            }
        }
    })
}

/// Spawns both sweepers with the configured intervals.
pub fn spawn_sweepers(
    tracker: Arc<LoginAttemptTracker>,
    store: Arc<TokenRevocationStore>,
    config: &SweepConfig,
) -> (JoinHandle<()>, JoinHandle<()>) {
    (
        spawn_lockout_sweeper(tracker, config.lockout_sweep_interval),
        spawn_revocation_sweeper(store, config.revocation_sweep_interval),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::LockoutConfig;
    use time::macros::datetime;

    #[tokio::test(start_paused = true)]
    async fn test_lockout_sweeper_prunes_on_schedule() {
        let clock = Arc::new(ManualClock::new(datetime!(2026-01-15 09:00:00 UTC)));
        let tracker = Arc::new(LoginAttemptTracker::new(
            &LockoutConfig::default(),
            clock.clone(),
        ));
        for _ in 0..3 {
            tracker.record_failed_attempt("alice");
        }
        assert_eq!(tracker.tracked_identities(), 1);

        // Lockout elapses on the manual clock; the sweeper runs on tokio time.
        clock.advance(Duration::from_secs(400));
        let handle = spawn_lockout_sweeper(tracker.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert_eq!(tracker.tracked_identities(), 0);
        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_revocation_sweeper_prunes_on_schedule() {
        let start = datetime!(2026-01-15 09:00:00 UTC);
        let clock = Arc::new(ManualClock::new(start));
        let store = Arc::new(TokenRevocationStore::new(clock.clone()));
        store.revoke("tok", start + Duration::from_secs(10));

        clock.advance(Duration::from_secs(20));
        let handle = spawn_revocation_sweeper(store.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        tokio::task::yield_now().await;

        assert!(store.is_empty());
        handle.abort();
    }
}
