//! Login/logout orchestration.
//!
//! [`AuthService`] composes the lockout tracker, token codec, and revocation
//! store with an external [`CredentialVerifier`] into the login protocol:
//!
//! 1. refuse immediately while the identity is locked (the verifier is
//!    never invoked for a locked identity, so its timing leaks nothing);
//! 2. delegate credential verification;
//! 3. on success clear the attempt counter and mint a token;
//! 4. on failure record the attempt and return the uniform failure.

use std::sync::Arc;

use time::Duration;

use crate::AuthResult;
use crate::clock::{Clock, SystemClock};
use crate::config::{AuthConfig, ConfigError};
use crate::error::{AuthError, InvalidTokenReason};
use crate::lockout::LoginAttemptTracker;
use crate::revocation::TokenRevocationStore;
use crate::token::{TokenClaims, TokenCodec};
use crate::verifier::CredentialVerifier;

/// Outcome of a successful login. Returned once, never retained.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// The authenticated identity.
    pub identity: String,
    /// The freshly issued bearer token.
    pub token: String,
}

/// The authentication orchestrator.
///
/// Constructed once at process start and shared by reference; all state
/// lives in the composed components, which are safe for concurrent use.
pub struct AuthService {
    attempts: Arc<LoginAttemptTracker>,
    revocations: Arc<TokenRevocationStore>,
    codec: Arc<TokenCodec>,
    verifier: Arc<dyn CredentialVerifier>,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Creates a service on the system clock.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration does not validate.
    pub fn new(
        config: &AuthConfig,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(config, verifier, Arc::new(SystemClock))
    }

    /// Creates a service on an injected clock (deterministic tests, replay).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration does not validate.
    pub fn with_clock(
        config: &AuthConfig,
        verifier: Arc<dyn CredentialVerifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            attempts: Arc::new(LoginAttemptTracker::new(&config.lockout, clock.clone())),
            revocations: Arc::new(TokenRevocationStore::new(clock.clone())),
            codec: Arc::new(TokenCodec::new(&config.token, clock.clone())),
            verifier,
            clock,
        })
    }

    /// Authenticates `identity` with `secret`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::AccountLocked`] while the identity is locked out; the
    ///   credential verifier is not consulted.
    /// - [`AuthError::AuthenticationFailed`] for a wrong secret or unknown
    ///   identity, uniformly.
    /// - Verifier infrastructure errors are propagated as-is and do not
    ///   count as a failed attempt.
    pub async fn login(&self, identity: &str, secret: &str) -> AuthResult<AuthenticationResult> {
        if self.attempts.is_account_locked(identity) {
            let remaining = self
                .attempts
                .lockout_info(identity)
                .locked_until
                .map_or(Duration::ZERO, |until| {
                    (until - self.clock.now()).max(Duration::ZERO)
                });
            tracing::warn!(identity, %remaining, "login refused: account locked");
            return Err(AuthError::account_locked(remaining));
        }

        if self.verifier.verify(identity, secret).await? {
            self.attempts.clear_attempts(identity);
            let token = self.codec.issue(identity)?;
            tracing::info!(identity, "login succeeded");
            Ok(AuthenticationResult {
                identity: identity.to_string(),
                token,
            })
        } else {
            self.attempts.record_failed_attempt(identity);
            tracing::debug!(identity, "login failed");
            Err(AuthError::AuthenticationFailed)
        }
    }

    /// Revokes `token` until its natural expiry.
    ///
    /// Idempotent and infallible from the caller's view: a blank token is a
    /// no-op, and a token that does not even parse is a no-op too (it could
    /// never validate, so there is nothing to revoke). An expired but
    /// genuine token is still recorded, which is why this parses rather
    /// than validates.
    pub fn logout(&self, token: &str) {
        if token.trim().is_empty() {
            return;
        }
        match self.codec.parse(token) {
            Ok(claims) => {
                self.revocations.revoke(token, claims.expires_at);
                tracing::info!(identity = %claims.subject, "logout: token revoked");
            }
            Err(e) => {
                tracing::debug!(error = %e, "logout ignored unparseable token");
            }
        }
    }

    /// Verifies `token` and returns its claims if it can be trusted.
    ///
    /// A token is trusted iff it verifies cryptographically, has not
    /// expired, and has not been revoked.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] with the applicable reason
    /// (`malformed`, `bad-signature`, `expired`, or `revoked`).
    pub fn authorize(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.codec.validate(token)?;
        if self.revocations.is_revoked(token) {
            tracing::debug!(identity = %claims.subject, "rejected revoked token");
            return Err(AuthError::invalid_token(InvalidTokenReason::Revoked));
        }
        Ok(claims)
    }

    /// The lockout tracker, for composition (sweeper, admin endpoints).
    #[must_use]
    pub fn attempt_tracker(&self) -> Arc<LoginAttemptTracker> {
        self.attempts.clone()
    }

    /// The revocation store, for composition (sweeper, admin endpoints).
    #[must_use]
    pub fn revocation_store(&self) -> Arc<TokenRevocationStore> {
        self.revocations.clone()
    }

    /// The token codec.
    #[must_use]
    pub fn token_codec(&self) -> Arc<TokenCodec> {
        self.codec.clone()
    }
}
