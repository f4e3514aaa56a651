//! # ticket_desk
//!
//! Session-token authentication and ownership-scoped authorization for a
//! support-ticket service.
//!
//! - [`auth`]: token codec, identity resolver, authorization gate, sessions
//! - [`session`]: where the session token lives (the `auth-token` cookie)
//! - [`ticket`] and [`user`]: domain services and their stores
//! - [`db`]: synchronous database port and MySQL adapter
//! - [`web`]: the axum HTTP surface
//! - [`config`], [`observe`], [`time`], [`error`]: ambient infrastructure
//!
//! ```rust
//! use std::sync::Arc;
//! use ticket_desk::auth::{Identity, SessionResolver, TokenCodec};
//! use ticket_desk::observe::MemoryRecorder;
//! use ticket_desk::session::MemorySessionStore;
//! use ticket_desk::time::SystemClock;
//!
//! let codec = Arc::new(TokenCodec::new(b"doc-secret", Arc::new(SystemClock::new())).unwrap());
//! let resolver = SessionResolver::new(codec.clone(), Arc::new(MemoryRecorder::default()));
//!
//! let store = MemorySessionStore::with_token(codec.issue("u-1".into()).unwrap());
//! assert_eq!(resolver.resolve(&store), Identity::authenticated("u-1"));
//! ```

// ===============================
// Re-exports of external crates
// ===============================

pub use anyhow;
pub use axum;
pub use axum_extra;
pub use chrono;
pub use jsonwebtoken;
pub use mysql;
pub use serde;
pub use serde_json;
pub use tokio;
pub use uuid;

// ===============================
// Public modules
// ===============================
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod observe;
pub mod session;
pub mod ticket;
pub mod time;
pub mod user;
pub mod web;
