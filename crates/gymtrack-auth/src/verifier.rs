//! Credential verification capability.
//!
//! The auth core does not know how credentials are stored or hashed; it
//! delegates to a [`CredentialVerifier`], typically backed by the user store
//! plus a password hasher elsewhere in the system.

use async_trait::async_trait;

use crate::AuthResult;

/// Verifies an identity/secret pair against the system's user store.
///
/// # Security
///
/// Implementations must return `Ok(false)` for **both** an unknown identity
/// and a wrong secret. The orchestrator maps either to the same uniform
/// `AuthenticationFailed` outcome, so the login surface cannot be used to
/// enumerate usernames. Implementations should also take comparable time on
/// both paths (e.g. hash against a dummy digest for unknown identities).
///
/// `Err` is reserved for infrastructure failures (store unreachable); it is
/// propagated to the caller and does **not** count as a failed attempt.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `Ok(true)` iff `secret` is the valid credential for
    /// `identity`.
    ///
    /// # Errors
    ///
    /// Returns an error only when verification itself could not be
    /// performed.
    async fn verify(&self, identity: &str, secret: &str) -> AuthResult<bool>;
}
