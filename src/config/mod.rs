//! Environment-driven configuration.

pub mod app;
pub mod auth;
pub mod csrf;
pub mod db;
pub mod env;
pub mod web;

pub use app::AppConfig;
pub use auth::AuthConfig;
pub use csrf::CsrfConfig;
pub use db::{DbConfig, create_pool};
pub use web::HttpConfig;
