//! Signed bearer token issuance and verification.
//!
//! [`TokenCodec`] mints compact, self-contained HS256 tokens carrying the
//! three claims this system needs: `sub` (identity), `iat`, and `exp`. No
//! live-session state is kept server-side; everything is reconstructed by
//! parsing.
//!
//! `parse` and `validate` are deliberately split: `parse` verifies signature
//! and structure but never expiry, so logout can still revoke an
//! already-expired token and callers can tell "forged" apart from
//! "expired". `validate` is what request-handling code must call before
//! trusting a subject. Expiry is checked only against the injected
//! [`Clock`]; the library's own wall-clock expiry validation (with its 60 s
//! default leeway) stays disabled.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::clock::Clock;
use crate::config::TokenConfig;
use crate::error::{AuthError, InvalidTokenReason};

/// Wire representation of the signed payload.
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Claims recovered from a verified token.
///
/// Transient value; reconstructed on every parse, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// The identity the token was issued to.
    pub subject: String,
    /// When the token was issued.
    pub issued_at: OffsetDateTime,
    /// When the token naturally expires.
    pub expires_at: OffsetDateTime,
}

/// Stateless signer/verifier for bearer tokens.
///
/// Side-effect-free and `Send + Sync`; safe for unlimited concurrent
/// callers.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_lifetime: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec from the token configuration.
    ///
    /// The secret must already have passed
    /// [`AuthConfig::validate`](crate::config::AuthConfig::validate).
    #[must_use]
    pub fn new(config: &TokenConfig, clock: Arc<dyn Clock>) -> Self {
        let secret = config.signing_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_lifetime: config.token_lifetime,
            clock,
        }
    }

    /// The configured token lifetime.
    #[must_use]
    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Issues a signed token for `identity`.
    ///
    /// `iat` is the current instant and `exp` is `iat + token_lifetime`,
    /// both as whole-second Unix timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if signing fails.
    pub fn issue(&self, identity: &str) -> AuthResult<String> {
        let now = self.clock.now();
        let claims = WireClaims {
            sub: identity.to_string(),
            iat: now.unix_timestamp(),
            exp: (now + self.token_lifetime).unix_timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("token encoding failed: {e}")))
    }

    /// Decodes a token and verifies its signature and structure.
    ///
    /// Does **not** check expiry: a structurally valid but expired token
    /// parses fine and returns claims with a past `expires_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] with reason `bad-signature` if
    /// the signature does not verify, or `malformed` if the structure or
    /// required claims are broken.
    pub fn parse(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<WireClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::InvalidSignature => InvalidTokenReason::BadSignature,
                _ => InvalidTokenReason::Malformed,
            };
            AuthError::invalid_token(reason)
        })?;

        let issued_at = OffsetDateTime::from_unix_timestamp(data.claims.iat)
            .map_err(|_| AuthError::invalid_token(InvalidTokenReason::Malformed))?;
        let expires_at = OffsetDateTime::from_unix_timestamp(data.claims.exp)
            .map_err(|_| AuthError::invalid_token(InvalidTokenReason::Malformed))?;

        Ok(TokenClaims {
            subject: data.claims.sub,
            issued_at,
            expires_at,
        })
    }

    /// Parses the token and additionally enforces expiry.
    ///
    /// This is the operation request-handling code must call before trusting
    /// the token's subject.
    ///
    /// # Errors
    ///
    /// Everything [`parse`](Self::parse) returns, plus
    /// [`AuthError::InvalidToken`] with reason `expired` when
    /// `expires_at <= now`.
    pub fn validate(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.parse(token)?;
        if claims.expires_at <= self.clock.now() {
            return Err(AuthError::invalid_token(InvalidTokenReason::Expired));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use time::macros::datetime;

    const T0: OffsetDateTime = datetime!(2026-01-15 09:00:00 UTC);
    const SECRET: &str = "an-integration-test-secret-of-32b";

    fn codec_at(start: OffsetDateTime) -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        let config = TokenConfig::default()
            .with_signing_secret(SECRET)
            .with_token_lifetime(Duration::from_secs(8 * 3600));
        (TokenCodec::new(&config, clock.clone()), clock)
    }

    #[test]
    fn test_round_trip() {
        let (codec, _) = codec_at(T0);
        let token = codec.issue("alice").unwrap();

        let claims = codec.validate(&token).unwrap();
        assert_eq!(claims.subject, "alice");
        assert_eq!(claims.issued_at, T0);
        assert_eq!(claims.expires_at, T0 + Duration::from_secs(8 * 3600));
    }

    #[test]
    fn test_expires_at_is_issued_at_plus_lifetime() {
        let clock = Arc::new(ManualClock::new(T0));
        let config = TokenConfig::default()
            .with_signing_secret(SECRET)
            .with_token_lifetime(Duration::from_secs(90));
        let codec = TokenCodec::new(&config, clock);

        let claims = codec.validate(&codec.issue("bob").unwrap()).unwrap();
        assert_eq!(claims.expires_at - claims.issued_at, time::Duration::seconds(90));
    }

    #[test]
    fn test_validate_fails_at_exact_expiry() {
        let (codec, clock) = codec_at(T0);
        let token = codec.issue("alice").unwrap();

        clock.advance(Duration::from_secs(8 * 3600));
        let err = codec.validate(&token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken {
                reason: InvalidTokenReason::Expired
            }
        ));
    }

    #[test]
    fn test_validate_succeeds_one_second_before_expiry() {
        let (codec, clock) = codec_at(T0);
        let token = codec.issue("alice").unwrap();

        clock.advance(Duration::from_secs(8 * 3600 - 1));
        assert!(codec.validate(&token).is_ok());
    }

    #[test]
    fn test_parse_succeeds_for_expired_token() {
        let (codec, clock) = codec_at(T0);
        let token = codec.issue("alice").unwrap();

        clock.advance(Duration::from_secs(9 * 3600));
        let claims = codec.parse(&token).unwrap();
        assert_eq!(claims.subject, "alice");
        assert!(claims.expires_at < clock.now());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let (codec, _) = codec_at(T0);
        let token = codec.issue("alice").unwrap();

        // Flip one character of the payload segment.
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        let mut payload: Vec<u8> = parts[1].bytes().collect();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            String::from_utf8(payload).unwrap(),
            parts[2]
        );

        let err = codec.parse(&tampered).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken {
                reason: InvalidTokenReason::BadSignature | InvalidTokenReason::Malformed
            }
        ));
        assert!(codec.validate(&tampered).is_err());
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let (codec, _) = codec_at(T0);
        let token = codec.issue("alice").unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let mut sig: Vec<u8> = parts[2].bytes().collect();
        sig[0] = if sig[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            parts[1],
            String::from_utf8(sig).unwrap()
        );

        let err = codec.parse(&tampered).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken {
                reason: InvalidTokenReason::BadSignature
            }
        ));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let (codec, _) = codec_at(T0);
        for garbage in ["", "not-a-token", "a.b", "a.b.c.d"] {
            let err = codec.parse(garbage).unwrap_err();
            assert!(matches!(
                err,
                AuthError::InvalidToken {
                    reason: InvalidTokenReason::Malformed
                }
            ));
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let (codec, _) = codec_at(T0);
        let other_config = TokenConfig::default()
            .with_signing_secret("a-completely-different-32b-secret!!!");
        let other = TokenCodec::new(&other_config, Arc::new(ManualClock::new(T0)));

        let token = other.issue("alice").unwrap();
        let err = codec.parse(&token).unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidToken {
                reason: InvalidTokenReason::BadSignature
            }
        ));
    }
}
