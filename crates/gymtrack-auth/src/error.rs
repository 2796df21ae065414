//! Authentication and session-security error types.
//!
//! The taxonomy is deliberately coarse on the failure side: wrong password
//! and unknown identity both surface as [`AuthError::AuthenticationFailed`]
//! with no distinguishing detail, so callers cannot be used as a username
//! enumeration oracle.

use std::fmt;

use time::Duration;

/// Errors that can occur during login, logout, and token authorization.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The identity is temporarily locked out after too many failed attempts.
    ///
    /// Recoverable by waiting; `remaining` is a retry-after hint.
    #[error("account locked, retry in {remaining}")]
    AccountLocked {
        /// Time left until the lockout elapses.
        remaining: Duration,
    },

    /// The supplied credentials did not verify.
    ///
    /// Covers both "unknown identity" and "wrong secret"; the two are never
    /// distinguished to the caller.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The presented token cannot be trusted.
    #[error("invalid token: {reason}")]
    InvalidToken {
        /// Why the token was rejected.
        reason: InvalidTokenReason,
    },

    /// A credential backend failed (not a credential mismatch).
    #[error("storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `AccountLocked` error.
    #[must_use]
    pub fn account_locked(remaining: Duration) -> Self {
        Self::AccountLocked { remaining }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(reason: InvalidTokenReason) -> Self {
        Self::InvalidToken { reason }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an authentication outcome the caller can
    /// surface to the end user (locked, failed, bad token).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::AccountLocked { .. } | Self::AuthenticationFailed | Self::InvalidToken { .. }
        )
    }

    /// Returns `true` if this is a server-side failure (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Storage { .. } | Self::Configuration { .. } | Self::Internal { .. }
        )
    }

    /// Returns `true` if this is a token-related error.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(self, Self::InvalidToken { .. })
    }

    /// Returns `true` if the caller may retry after waiting.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AccountLocked { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AccountLocked { .. } => ErrorCategory::Lockout,
            Self::AuthenticationFailed => ErrorCategory::Authentication,
            Self::InvalidToken { .. } => ErrorCategory::Token,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidTokenReason {
    /// The token structure could not be decoded or required claims are missing.
    Malformed,
    /// The signature does not verify against the server key.
    BadSignature,
    /// The token verified but its expiry has passed.
    Expired,
    /// The token was explicitly revoked before its natural expiry.
    Revoked,
}

impl InvalidTokenReason {
    /// Returns the reason as a stable string for logs and API payloads.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::BadSignature => "bad-signature",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for InvalidTokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categories of authentication errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential verification outcomes.
    Authentication,
    /// Brute-force lockout refusals.
    Lockout,
    /// Token verification failures.
    Token,
    /// Credential backend failures.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Lockout => write!(f, "lockout"),
            Self::Token => write!(f, "token"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::account_locked(Duration::minutes(5));
        assert!(err.to_string().starts_with("account locked"));

        let err = AuthError::AuthenticationFailed;
        assert_eq!(err.to_string(), "authentication failed");

        let err = AuthError::invalid_token(InvalidTokenReason::BadSignature);
        assert_eq!(err.to_string(), "invalid token: bad-signature");

        let err = AuthError::storage("connection refused");
        assert_eq!(err.to_string(), "storage error: connection refused");
    }

    #[test]
    fn test_authentication_failed_carries_no_detail() {
        // Both failure causes must render identically to the caller.
        let unknown_user = AuthError::AuthenticationFailed;
        let wrong_password = AuthError::AuthenticationFailed;
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::account_locked(Duration::seconds(30));
        assert!(err.is_client_error());
        assert!(err.is_retryable());
        assert!(!err.is_server_error());

        let err = AuthError::invalid_token(InvalidTokenReason::Expired);
        assert!(err.is_client_error());
        assert!(err.is_token_error());
        assert!(!err.is_retryable());

        let err = AuthError::storage("down");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::AuthenticationFailed.category(),
            ErrorCategory::Authentication
        );
        assert_eq!(
            AuthError::account_locked(Duration::ZERO).category(),
            ErrorCategory::Lockout
        );
        assert_eq!(
            AuthError::invalid_token(InvalidTokenReason::Malformed).category(),
            ErrorCategory::Token
        );
        assert_eq!(
            AuthError::configuration("bad").category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_invalid_token_reason_strings() {
        assert_eq!(InvalidTokenReason::Malformed.as_str(), "malformed");
        assert_eq!(InvalidTokenReason::BadSignature.as_str(), "bad-signature");
        assert_eq!(InvalidTokenReason::Expired.as_str(), "expired");
        assert_eq!(InvalidTokenReason::Revoked.as_str(), "revoked");
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Lockout.to_string(), "lockout");
        assert_eq!(ErrorCategory::Token.to_string(), "token");
        assert_eq!(
            ErrorCategory::Infrastructure.to_string(),
            "infrastructure"
        );
    }
}
