//! # Session Cookie
//!
//! Stores the session token in the `auth-token` cookie with fixed attributes:
//!
//! ```text
//! auth-token=<token>; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800[; Secure]
//! ```
//!
//! `Secure` is controlled by [`SessionCookiePolicy`] (on in production).
//!
//! # Example
//! ```rust
//! use axum_extra::extract::cookie::CookieJar;
//! use ticket_desk::session::{CookieSessionStore, SessionCookiePolicy, SessionStore};
//!
//! let mut store = CookieSessionStore::new(CookieJar::new(), SessionCookiePolicy::new(true));
//! store.put("header.claims.signature");
//!
//! assert_eq!(store.get().as_deref(), Some("header.claims.signature"));
//! ```

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;

use crate::auth::token::SESSION_TTL_SECS;
use crate::session::store::SessionStore;

/// Cookie name used to store the session token.
pub const SESSION_COOKIE_NAME: &str = "auth-token";

/// Cookie attributes that vary by deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionCookiePolicy {
    /// Adds the `Secure` attribute (HTTPS-only transport).
    pub secure: bool,
}

impl SessionCookiePolicy {
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }
}

/// Builds the session cookie carrying `token`.
pub fn build_session_cookie(token: &str, policy: SessionCookiePolicy) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(policy.secure)
        .path("/")
        .max_age(Duration::seconds(SESSION_TTL_SECS))
        .build()
}

/// A [`SessionStore`] over the request's [`CookieJar`].
///
/// Handlers build one from the incoming jar, pass it through the session
/// operations, then return [`CookieSessionStore::into_jar`] with the response
/// so that any `Set-Cookie` changes reach the client.
#[derive(Clone, Debug)]
pub struct CookieSessionStore {
    jar: CookieJar,
    policy: SessionCookiePolicy,
}

impl CookieSessionStore {
    pub fn new(jar: CookieJar, policy: SessionCookiePolicy) -> Self {
        Self { jar, policy }
    }

    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self) -> Option<String> {
        self.jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn put(&mut self, token: &str) {
        let cookie = build_session_cookie(token, self.policy);
        self.jar = self.jar.clone().add(cookie);
    }

    fn clear(&mut self) {
        // The removal cookie repeats the attributes of the one it replaces.
        let removal = Cookie::build((SESSION_COOKIE_NAME, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.policy.secure)
            .path("/")
            .build();
        self.jar = self.jar.clone().remove(removal);
    }
}
