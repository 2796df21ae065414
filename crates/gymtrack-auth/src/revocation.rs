//! Token revocation store ("blacklist").
//!
//! Makes a previously issued token unusable before its natural expiry.
//! Entries are keyed by a SHA-256 fingerprint of the token string rather
//! than the raw token, so the store never holds live bearer credentials and
//! every entry has a fixed size.
//!
//! An entry is only meaningful while the token it shadows is still alive:
//! once the stored expiry passes, the token is invalid through expiry alone
//! and the entry is semantically absent. Lazy removal on lookup plus the
//! periodic sweep keep the map bounded by the number of revoked, still-live
//! tokens.
//!
//! Capacity is bounded by natural expiry only. A caller that can mint and
//! immediately revoke unlimited distinct tokens can grow this store until
//! those tokens expire; deployments cap `token_lifetime` to bound the
//! worst case. This is a documented limitation of the in-memory design, not
//! an error condition.

use std::sync::Arc;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::clock::Clock;

/// In-memory set of revoked-but-not-yet-expired tokens.
pub struct TokenRevocationStore {
    revoked: DashMap<String, OffsetDateTime>,
    clock: Arc<dyn Clock>,
}

impl TokenRevocationStore {
    /// Creates an empty revocation store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            revoked: DashMap::new(),
            clock,
        }
    }

    fn fingerprint(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Marks `token` as revoked until its natural expiry.
    ///
    /// Unconditional and idempotent: revoking an already-revoked token
    /// overwrites the stored expiry.
    pub fn revoke(&self, token: &str, expires_at: OffsetDateTime) {
        self.revoked.insert(Self::fingerprint(token), expires_at);
        tracing::debug!(expires_at = %expires_at, "token revoked");
    }

    /// Returns `true` iff `token` was revoked and its expiry is still in the
    /// future.
    ///
    /// An entry whose expiry has passed is removed on the way out and the
    /// call returns `false`: the token is invalid through expiry, not
    /// through revocation.
    #[must_use]
    pub fn is_revoked(&self, token: &str) -> bool {
        let now = self.clock.now();
        let key = Self::fingerprint(token);
        let expires_at = match self.revoked.get(&key) {
            Some(entry) => *entry,
            None => return false,
        };

        if expires_at > now {
            true
        } else {
            self.revoked.remove_if(&key, |_, expiry| *expiry <= now);
            false
        }
    }

    /// Removes every entry whose expiry has passed, returning the number
    /// removed.
    ///
    /// Run periodically (see [`crate::sweep`]); bounds memory independent of
    /// lookup traffic.
    pub fn sweep_expired(&self) -> u64 {
        let now = self.clock.now();
        let mut removed = 0u64;
        self.revoked.retain(|_, expires_at| {
            if *expires_at <= now {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of entries currently held (including expired entries not yet
    /// swept).
    #[must_use]
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::time::Duration;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2026-01-15 09:00:00 UTC);

    fn store_at(start: OffsetDateTime) -> (TokenRevocationStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        (TokenRevocationStore::new(clock.clone()), clock)
    }

    #[test]
    fn test_unknown_token_is_not_revoked() {
        let (store, _) = store_at(T0);
        assert!(!store.is_revoked("never-seen"));
    }

    #[test]
    fn test_revoked_token_stays_revoked_until_expiry() {
        let (store, clock) = store_at(T0);
        store.revoke("tok", T0 + Duration::from_secs(3600));

        assert!(store.is_revoked("tok"));
        clock.advance(Duration::from_secs(3599));
        assert!(store.is_revoked("tok"));
    }

    #[test]
    fn test_expired_entry_is_no_longer_revoked() {
        let (store, clock) = store_at(T0);
        store.revoke("tok", T0 + Duration::from_secs(3600));

        // At exactly the expiry instant the entry is stale.
        clock.advance(Duration::from_secs(3600));
        assert!(!store.is_revoked("tok"));
        // And lazily removed.
        assert!(store.is_empty());
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let (store, _) = store_at(T0);
        store.revoke("tok", T0 + Duration::from_secs(100));
        store.revoke("tok", T0 + Duration::from_secs(200));
        assert_eq!(store.len(), 1);
        assert!(store.is_revoked("tok"));
    }

    #[test]
    fn test_raw_token_is_not_stored() {
        let (store, _) = store_at(T0);
        let token = "eyJhbGciOiJIUzI1NiJ9.secret-bearer-material.sig";
        store.revoke(token, T0 + Duration::from_secs(60));
        let keys: Vec<String> = store
            .revoked
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        assert_eq!(keys.len(), 1);
        assert_ne!(keys[0], token);
        assert_eq!(keys[0].len(), 64); // sha-256 hex
    }

    #[test]
    fn test_sweep_removes_only_expired_entries() {
        let (store, clock) = store_at(T0);
        store.revoke("dead-1", T0 + Duration::from_secs(10));
        store.revoke("dead-2", T0 + Duration::from_secs(20));
        store.revoke("alive", T0 + Duration::from_secs(3600));

        clock.advance(Duration::from_secs(30));
        let removed = store.sweep_expired();
        assert_eq!(removed, 2);
        assert_eq!(store.len(), 1);
        assert!(store.is_revoked("alive"));
    }

    #[test]
    fn test_sweep_on_empty_store() {
        let (store, _) = store_at(T0);
        assert_eq!(store.sweep_expired(), 0);
    }
}
