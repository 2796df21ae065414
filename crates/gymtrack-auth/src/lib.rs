//! # gymtrack-auth
//!
//! Authentication and session-security core for the GymTrack server.
//!
//! This crate provides:
//! - Brute-force lockout tracking with time-boxed, self-healing lockouts
//! - Signed bearer-token (JWT) issuance and validation
//! - Token revocation (blacklist) for logout before natural expiry
//! - The login/logout orchestrator tying them together
//!
//! ## Overview
//!
//! The core is a library consumed by the HTTP layer; it defines no routes
//! of its own. Credential storage and password hashing stay outside, behind
//! the [`CredentialVerifier`] capability. All state is in-memory and
//! process-local by design: it is lost on restart, which is a documented
//! simplification, not an accident.
//!
//! Every time comparison goes through an injected [`Clock`], so expiry
//! logic is deterministic under test and immune to wall-clock drift within
//! the process. All shared state supports concurrent request handlers plus
//! the background sweepers without external locking.
//!
//! ## Modules
//!
//! - [`clock`] - Injectable time source
//! - [`config`] - Lockout, token, and sweep configuration
//! - [`error`] - Error taxonomy
//! - [`lockout`] - Failed-attempt tracking and lockout enforcement
//! - [`revocation`] - Revoked-token store
//! - [`service`] - Login/logout/authorize orchestration
//! - [`sweep`] - Periodic memory-bounding sweeps
//! - [`token`] - Bearer token codec
//! - [`verifier`] - Credential verification capability

pub mod clock;
pub mod config;
pub mod error;
pub mod lockout;
pub mod revocation;
pub mod service;
pub mod sweep;
pub mod token;
pub mod verifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    AuthConfig, ConfigError, LockoutConfig, MIN_SIGNING_SECRET_BYTES, SweepConfig, TokenConfig,
};
pub use error::{AuthError, ErrorCategory, InvalidTokenReason};
pub use lockout::{LockoutInfo, LoginAttemptTracker};
pub use revocation::TokenRevocationStore;
pub use service::{AuthService, AuthenticationResult};
pub use sweep::{spawn_lockout_sweeper, spawn_revocation_sweeper, spawn_sweepers};
pub use token::{TokenClaims, TokenCodec};
pub use verifier::CredentialVerifier;

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use gymtrack_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::{AuthConfig, ConfigError};
    pub use crate::error::{AuthError, InvalidTokenReason};
    pub use crate::service::{AuthService, AuthenticationResult};
    pub use crate::token::TokenClaims;
    pub use crate::verifier::CredentialVerifier;
}
