//! # Session Store Port
//!
//! A session store carries the current session token for one client context.
//! It never interprets the token.
//!
//! Implementations:
//! - [`CookieSessionStore`](crate::session::cookie::CookieSessionStore): the
//!   `auth-token` HTTP cookie
//! - [`MemorySessionStore`]: a plain slot, for tests and non-HTTP callers

/// Per-client carrier of the session token.
///
/// - `get` returns the stored token or `None`
/// - `put` replaces the stored token
/// - `clear` removes it; clearing an empty store is a no-op
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn put(&mut self, token: &str);

    fn clear(&mut self);
}

/// A session store backed by a single in-memory slot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySessionStore {
    token: Option<String>,
}

impl MemorySessionStore {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token.clone()
    }

    fn put(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    fn clear(&mut self) {
        self.token = None;
    }
}
