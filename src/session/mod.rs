//! Session store adapter: carries the signed session token for one client.

pub mod cookie;
pub mod store;

pub use self::cookie::{
    CookieSessionStore, SESSION_COOKIE_NAME, SessionCookiePolicy, build_session_cookie,
};
pub use self::store::{MemorySessionStore, SessionStore};
