//! # Session Authentication Configuration
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `AUTH_SECRET` | HMAC key for session tokens | *required* |
//! | `AUTH_COOKIE_SECURE` | `Secure` attribute on the session cookie | on iff `APP_ENV=production` |
//!
//! The secret is never printed. `Debug` redacts it and [`AuthConfig::fingerprint`]
//! identifies it in logs.

use std::fmt;

use anyhow::{Result, bail};
use sha2::{Digest, Sha256};

use crate::config::env::read_flag_from;
use crate::session::cookie::SessionCookiePolicy;

#[derive(Clone)]
pub struct AuthConfig {
    secret: Vec<u8>,
    pub cookie_secure: bool,
}

impl AuthConfig {
    pub fn new(secret: impl Into<Vec<u8>>, cookie_secure: bool) -> Self {
        Self {
            secret: secret.into(),
            cookie_secure,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Fails when `AUTH_SECRET` is missing or blank.
    pub fn from_env_with<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match get("AUTH_SECRET") {
            Some(s) if !s.trim().is_empty() => s,
            _ => bail!("AUTH_SECRET must be set to a non-empty value"),
        };

        let production = get("APP_ENV").as_deref() == Some("production");
        let cookie_secure = read_flag_from(&get, "AUTH_COOKIE_SECURE", production);

        Ok(Self::new(secret.into_bytes(), cookie_secure))
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// First 8 hex characters of the secret's SHA-256 digest.
    pub fn fingerprint(&self) -> String {
        Sha256::digest(&self.secret)
            .iter()
            .take(4)
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    pub fn cookie_policy(&self) -> SessionCookiePolicy {
        SessionCookiePolicy::new(self.cookie_secure)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &format_args!("<redacted {}>", self.fingerprint()))
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AuthConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AuthConfig::from_env_with(|k| map.get(k).cloned())
    }

    #[test]
    fn missing_or_blank_secret_is_an_error() {
        assert!(load(&[]).is_err());
        let err = load(&[("AUTH_SECRET", "   ")]).unwrap_err();
        assert!(err.to_string().contains("AUTH_SECRET"));
    }

    #[test]
    fn secure_follows_app_env_unless_overridden() {
        let dev = load(&[("AUTH_SECRET", "s")]).unwrap();
        assert!(!dev.cookie_secure);

        let prod = load(&[("AUTH_SECRET", "s"), ("APP_ENV", "production")]).unwrap();
        assert!(prod.cookie_secure);

        let forced = load(&[
            ("AUTH_SECRET", "s"),
            ("APP_ENV", "production"),
            ("AUTH_COOKIE_SECURE", "false"),
        ])
        .unwrap();
        assert!(!forced.cookie_secure);
        assert_eq!(forced.cookie_policy(), SessionCookiePolicy::new(false));
    }

    #[test]
    fn fingerprint_is_short_and_stable() {
        let a = AuthConfig::new("correct horse battery staple", false);
        let b = AuthConfig::new("correct horse battery staple", true);

        assert_eq!(a.fingerprint().len(), 8);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), AuthConfig::new("other", false).fingerprint());
    }

    #[test]
    fn debug_never_prints_secret() {
        let cfg = AuthConfig::new("hunter2-super-secret", false);

        let dbg = format!("{cfg:?}");

        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains(&cfg.fingerprint()));
    }

    #[test]
    fn from_env_reads_process_env() {
        temp_env::with_vars(
            [("AUTH_SECRET", Some("from-env")), ("APP_ENV", None::<&str>)],
            || {
                let cfg = AuthConfig::from_env().unwrap();
                assert_eq!(cfg.secret(), b"from-env");
            },
        );
    }
}
