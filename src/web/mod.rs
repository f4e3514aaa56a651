//! HTTP surface: axum router, handlers, CSRF guard, and response mapping.

pub mod account;
pub mod csrf;
pub mod fallback;
pub mod identity;
pub mod response;
pub mod router;
pub mod state;
pub mod tickets;

pub use identity::CurrentIdentity;
pub use router::router;
pub use state::{AppState, Stores};
