//! Authentication configuration.
//!
//! Configuration is organized into sub-sections mirroring the components it
//! tunes: brute-force lockout, token issuance, and the background sweepers.
//! All durations accept humantime strings in config files.
//!
//! # Example (TOML)
//!
//! ```toml
//! [auth.lockout]
//! max_failed_attempts = 3
//! lockout_duration = "5m"
//!
//! [auth.token]
//! token_lifetime = "8h"
//! signing_secret = "<at least 32 bytes of entropy>"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum accepted signing secret length in bytes (256 bits).
pub const MIN_SIGNING_SECRET_BYTES: usize = 32;

/// Root configuration for the authentication core.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Brute-force lockout tuning.
    pub lockout: LockoutConfig,

    /// Token issuance tuning.
    pub token: TokenConfig,

    /// Background sweep scheduling.
    pub sweep: SweepConfig,
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any threshold is zero or the signing
    /// secret is missing or too short.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lockout.max_failed_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lockout.max_failed_attempts",
                message: "must be at least 1".to_string(),
            });
        }
        if self.lockout.lockout_duration.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "lockout.lockout_duration",
                message: "must be non-zero".to_string(),
            });
        }
        if self.token.token_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "token.token_lifetime",
                message: "must be non-zero".to_string(),
            });
        }
        if self.token.signing_secret.len() < MIN_SIGNING_SECRET_BYTES {
            return Err(ConfigError::WeakSigningSecret {
                min_bytes: MIN_SIGNING_SECRET_BYTES,
            });
        }
        Ok(())
    }
}

/// Brute-force lockout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LockoutConfig {
    /// Consecutive failed attempts that trigger a lockout.
    pub max_failed_attempts: u32,

    /// How long an identity stays locked once the threshold is reached.
    #[serde(with = "humantime_serde")]
    pub lockout_duration: Duration,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 3,
            lockout_duration: Duration::from_secs(5 * 60),
        }
    }
}

impl LockoutConfig {
    /// Sets the failed-attempt threshold.
    #[must_use]
    pub fn with_max_failed_attempts(mut self, max: u32) -> Self {
        self.max_failed_attempts = max;
        self
    }

    /// Sets the lockout duration.
    #[must_use]
    pub fn with_lockout_duration(mut self, duration: Duration) -> Self {
        self.lockout_duration = duration;
        self
    }
}

/// Token issuance configuration.
///
/// The signing secret has no usable default; deployments must provide one.
/// `validate()` rejects anything shorter than [`MIN_SIGNING_SECRET_BYTES`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Lifetime of issued tokens.
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,

    /// Symmetric signing secret (HS256). Required, >= 256 bits.
    #[serde(skip_serializing)]
    pub signing_secret: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            token_lifetime: Duration::from_secs(8 * 3600),
            signing_secret: String::new(),
        }
    }
}

impl TokenConfig {
    /// Sets the token lifetime.
    #[must_use]
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Sets the signing secret.
    #[must_use]
    pub fn with_signing_secret(mut self, secret: impl Into<String>) -> Self {
        self.signing_secret = secret.into();
        self
    }
}

/// Background sweep configuration.
///
/// The sweeps only bound memory; lockout and revocation checks stay correct
/// without them through lazy expiry on lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SweepConfig {
    /// How often expired lockout records are purged.
    #[serde(with = "humantime_serde")]
    pub lockout_sweep_interval: Duration,

    /// How often expired revocation entries are purged.
    #[serde(with = "humantime_serde")]
    pub revocation_sweep_interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            lockout_sweep_interval: Duration::from_secs(3600),
            revocation_sweep_interval: Duration::from_secs(15 * 60),
        }
    }
}

/// Errors raised by [`AuthConfig::validate`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A field holds an unusable value.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// The signing secret is missing or below the minimum entropy bound.
    #[error("signing secret must be at least {min_bytes} bytes")]
    WeakSigningSecret {
        /// Minimum accepted secret length in bytes.
        min_bytes: usize,
    },
}
