//! # Session Tokens (JWT, HS256)
//!
//! This module signs session claims into a compact token and verifies tokens
//! back into claims. It does **not** access environment variables or cookies.
//!
//! ## Wire format
//! ```text
//! <header_b64url>.<claims_b64url>.<signature_b64url>
//! ```
//! - Header: `{"typ":"JWT","alg":"HS256"}`; any other algorithm is rejected
//! - Claims: [`SessionClaims`] (`sub`, `iat`, `exp` in UNIX seconds)
//! - Signature: HMAC-SHA256 over `header.claims` with the process secret
//!
//! ## Lifetime
//! Tokens expire [`SESSION_TTL_SECS`] after `iat`. A token is valid while
//! `now <= exp`.
//!
//! ## Provided items
//! - [`TokenCodec::sign`] / [`TokenCodec::verify`]
//! - [`TokenCodec::issue`]: claims for "now" plus signing
//! - [`token_excerpt`]: the only form of a token allowed in diagnostics

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::principal::SubjectId;
use crate::time::clock::Clock;

/// Fixed session lifetime: 7 days, in seconds.
pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// Characters of a token that may appear in logs.
const EXCERPT_LEN: usize = 10;

/// Claims embedded in a session token.
///
/// Claims are immutable once signed; any change breaks the signature.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the authenticated principal.
    pub sub: SubjectId,
    /// Issued-at (UTC, seconds since UNIX epoch).
    pub iat: i64,
    /// Expiration (UTC, seconds since UNIX epoch); always `iat + SESSION_TTL_SECS`.
    pub exp: i64,
}

impl SessionClaims {
    /// Builds claims for `subject` issued at `issued_at`.
    ///
    /// Sub-second precision is dropped; the window is measured in whole seconds.
    pub fn new(subject: SubjectId, issued_at: DateTime<Utc>) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: subject,
            iat,
            exp: iat + SESSION_TTL_SECS,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// Failures of token signing and verification.
///
/// Verification failures must collapse to an anonymous session at the
/// resolver boundary; they are distinct here only for diagnostics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Short machine-readable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::Signing(_) => "signing",
        }
    }
}

impl From<JwtError> for TokenError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

/// Signs and verifies session tokens with a process-wide HMAC secret.
///
/// The codec is built once at startup and shared via `Arc`; it holds no
/// mutable state.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec from the signing secret and a time source.
    ///
    /// ## Errors
    /// Returns [`TokenError::Signing`] if the secret is empty.
    ///
    /// ## Example
    /// ```
    /// use std::sync::Arc;
    /// use ticket_desk::auth::{SubjectId, TokenCodec};
    /// use ticket_desk::time::SystemClock;
    ///
    /// let codec = TokenCodec::new(b"doc-secret", Arc::new(SystemClock)).unwrap();
    /// let token = codec.issue(SubjectId::new("7")).unwrap();
    /// let claims = codec.verify(&token).unwrap();
    ///
    /// assert_eq!(claims.sub.as_str(), "7");
    /// ```
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".into()));
        }

        // Expiry is checked against the injected clock, not the OS clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        })
    }

    /// Signs `claims` into a token string.
    pub fn sign(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Builds claims for `subject` issued now and signs them.
    pub fn issue(&self, subject: SubjectId) -> Result<String, TokenError> {
        self.sign(&SessionClaims::new(subject, self.clock.now()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// ## Errors
    /// - [`TokenError::Malformed`]: not three segments, bad encoding, bad JSON,
    ///   missing claims, or an algorithm other than HS256
    /// - [`TokenError::InvalidSignature`]: signature mismatch
    /// - [`TokenError::Expired`]: `now > exp`
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Returns at most the first ten characters of `token`, for diagnostics.
pub fn token_excerpt(token: &str) -> String {
    token.chars().take(EXCERPT_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::{Duration, TimeZone};

    use crate::time::clock::FixedClock;

    const SECRET: &[u8] = b"unit-test-secret";

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap()
    }

    fn codec_at(clock: Arc<FixedClock>) -> TokenCodec {
        TokenCodec::new(SECRET, clock).unwrap()
    }

    fn segments(token: &str) -> Vec<Vec<u8>> {
        token
            .split('.')
            .map(|s| URL_SAFE_NO_PAD.decode(s).unwrap())
            .collect()
    }

    fn join(parts: &[Vec<u8>]) -> String {
        parts
            .iter()
            .map(|p| URL_SAFE_NO_PAD.encode(p))
            .collect::<Vec<_>>()
            .join(".")
    }

    #[test]
    fn sign_and_verify_returns_identical_claims() {
        let clock = Arc::new(FixedClock::new(t0()));
        let codec = codec_at(clock);
        let claims = SessionClaims::new(SubjectId::new("42"), t0());

        let token = codec.sign(&claims).unwrap();
        let back = codec.verify(&token).unwrap();

        assert_eq!(back, claims);
    }

    #[test]
    fn claims_expire_seven_days_after_issue() {
        let claims = SessionClaims::new(SubjectId::new("1"), t0());

        assert_eq!(claims.iat, t0().timestamp());
        assert_eq!(claims.exp - claims.iat, 604_800);
    }

    #[test]
    fn token_has_three_segments_and_hs256_header() {
        let codec = codec_at(Arc::new(FixedClock::new(t0())));
        let token = codec.issue(SubjectId::new("1")).unwrap();

        let parts = segments(&token);
        assert_eq!(parts.len(), 3);

        let header: serde_json::Value = serde_json::from_slice(&parts[0]).unwrap();
        assert_eq!(header["alg"], "HS256");
        assert_eq!(parts[2].len(), 32, "HMAC-SHA256 tag must be 32 bytes");
    }

    #[test]
    fn verify_accepts_token_just_before_expiry() {
        let clock = Arc::new(FixedClock::new(t0()));
        let codec = codec_at(clock.clone());
        let token = codec.issue(SubjectId::new("1")).unwrap();

        clock.set(t0() + Duration::days(6) + Duration::hours(23));
        assert!(codec.verify(&token).is_ok());

        clock.set(t0() + Duration::days(7));
        assert!(codec.verify(&token).is_ok(), "valid at exactly exp");
    }

    #[test]
    fn verify_rejects_token_after_expiry() {
        let clock = Arc::new(FixedClock::new(t0()));
        let codec = codec_at(clock.clone());
        let token = codec.issue(SubjectId::new("1")).unwrap();

        clock.set(t0() + Duration::days(7) + Duration::seconds(1));
        assert_eq!(codec.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn flipped_signature_byte_is_rejected() {
        let codec = codec_at(Arc::new(FixedClock::new(t0())));
        let token = codec.issue(SubjectId::new("1")).unwrap();

        let mut parts = segments(&token);
        for i in 0..parts[2].len() {
            let mut tampered = parts.clone();
            tampered[2][i] ^= 0x01;
            assert_eq!(
                codec.verify(&join(&tampered)),
                Err(TokenError::InvalidSignature),
                "signature byte {i}"
            );
        }

        parts[2][0] ^= 0x80;
        assert!(codec.verify(&join(&parts)).is_err());
    }

    #[test]
    fn flipped_claims_byte_is_rejected() {
        let codec = codec_at(Arc::new(FixedClock::new(t0())));
        let token = codec.issue(SubjectId::new("alice")).unwrap();

        let parts = segments(&token);
        for i in 0..parts[1].len() {
            let mut tampered = parts.clone();
            tampered[1][i] ^= 0x01;
            assert_eq!(
                codec.verify(&join(&tampered)),
                Err(TokenError::InvalidSignature),
                "claims byte {i}"
            );
        }
    }

    #[test]
    fn escalated_subject_is_rejected() {
        let codec = codec_at(Arc::new(FixedClock::new(t0())));
        let token = codec.issue(SubjectId::new("alice")).unwrap();

        let mut parts = segments(&token);
        let forged = SessionClaims::new(SubjectId::new("bob"), t0());
        parts[1] = serde_json::to_vec(&forged).unwrap();

        assert_eq!(
            codec.verify(&join(&parts)),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let clock = Arc::new(FixedClock::new(t0()));
        let other = TokenCodec::new(b"another-secret", clock.clone()).unwrap();
        let token = other.issue(SubjectId::new("1")).unwrap();

        assert_eq!(
            codec_at(clock).verify(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        let codec = codec_at(Arc::new(FixedClock::new(t0())));
        let token = codec.issue(SubjectId::new("1")).unwrap();

        assert_eq!(codec.verify("not-a-valid-token"), Err(TokenError::Malformed));
        assert_eq!(codec.verify("a.b"), Err(TokenError::Malformed));
        assert_eq!(
            codec.verify(&format!("{token}.extra")),
            Err(TokenError::Malformed)
        );
        assert_eq!(codec.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn unrecognized_algorithm_is_malformed() {
        let codec = codec_at(Arc::new(FixedClock::new(t0())));
        let token = codec.issue(SubjectId::new("1")).unwrap();
        let mut parts = segments(&token);

        parts[0] = br#"{"typ":"JWT","alg":"none"}"#.to_vec();
        assert_eq!(codec.verify(&join(&parts)), Err(TokenError::Malformed));

        parts[0] = br#"{"typ":"JWT","alg":"HS512"}"#.to_vec();
        assert_eq!(codec.verify(&join(&parts)), Err(TokenError::Malformed));
    }

    #[test]
    fn empty_secret_is_a_signing_error() {
        let result = TokenCodec::new(b"", Arc::new(FixedClock::new(t0())));

        assert!(matches!(result, Err(TokenError::Signing(_))));
    }

    #[test]
    fn excerpt_is_short_and_prefix_of_token() {
        let codec = codec_at(Arc::new(FixedClock::new(t0())));
        let token = codec.issue(SubjectId::new("1")).unwrap();

        let excerpt = token_excerpt(&token);
        assert_eq!(excerpt.len(), 10);
        assert!(token.starts_with(&excerpt));
        assert_eq!(token_excerpt("abc"), "abc");
    }

    #[test]
    fn error_kinds_are_stable_labels() {
        assert_eq!(TokenError::Malformed.kind(), "malformed");
        assert_eq!(TokenError::InvalidSignature.kind(), "invalid_signature");
        assert_eq!(TokenError::Expired.kind(), "expired");
        assert_eq!(TokenError::Signing("x".into()).kind(), "signing");
    }
}
