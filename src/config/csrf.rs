//! # CSRF Configuration
//!
//! - `CSRF_SECRET`: any string, stretched to a 32-byte HMAC key with SHA-256.
//!   When absent a random key is generated, so tokens do not survive a restart.
//! - `CSRF_COOKIE_SECURE`: `Secure` on the `csrf` cookie (default: on iff
//!   `APP_ENV=production`)
//! - `CSRF_COOKIE_HTTPONLY`: `HttpOnly` on the `csrf` cookie (default: on).
//!   Clients read the token from `GET /csrf`, not from the cookie.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::config::env::read_flag_from;

#[derive(Clone, PartialEq, Eq)]
pub struct CsrfConfig {
    pub secret: [u8; 32],
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
}

impl CsrfConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match get("CSRF_SECRET") {
            Some(s) if !s.trim().is_empty() => derive_secret_from_string(&s),
            _ => random_secret(),
        };
        let production = get("APP_ENV").as_deref() == Some("production");

        Self {
            secret,
            cookie_secure: read_flag_from(&get, "CSRF_COOKIE_SECURE", production),
            cookie_http_only: read_flag_from(&get, "CSRF_COOKIE_HTTPONLY", true),
        }
    }
}

impl std::fmt::Debug for CsrfConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfConfig")
            .field("secret", &"<redacted>")
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_http_only", &self.cookie_http_only)
            .finish()
    }
}

pub fn derive_secret_from_string(s: &str) -> [u8; 32] {
    let digest = Sha256::digest(s.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

pub fn random_secret() -> [u8; 32] {
    let mut key = [0u8; 32];
    rand::rng().fill_bytes(&mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_missing() {
        let cfg = CsrfConfig::from_env_with(|_| None);

        assert!(!cfg.cookie_secure);
        assert!(cfg.cookie_http_only);
    }

    #[test]
    fn respects_secret_and_flags() {
        let fake: HashMap<&str, &str> = [
            ("CSRF_SECRET", "my-top-secret"),
            ("APP_ENV", "production"),
            ("CSRF_COOKIE_HTTPONLY", "0"),
        ]
        .into_iter()
        .collect();

        let cfg = CsrfConfig::from_env_with(|k| fake.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.secret, derive_secret_from_string("my-top-secret"));
        assert!(cfg.cookie_secure);
        assert!(!cfg.cookie_http_only);
    }

    #[test]
    fn random_secret_varies_across_loads() {
        let a = CsrfConfig::from_env_with(|_| None);
        let b = CsrfConfig::from_env_with(|_| None);

        assert_ne!(a.secret, b.secret);
    }

    #[test]
    fn derived_secret_is_stable() {
        assert_eq!(derive_secret_from_string("abc"), derive_secret_from_string("abc"));
        assert_ne!(derive_secret_from_string("abc"), derive_secret_from_string("xyz"));
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = CsrfConfig::from_env_with(|k| (k == "CSRF_SECRET").then(|| "s3cr3t".into()));

        assert!(format!("{cfg:?}").contains("<redacted>"));
    }
}
