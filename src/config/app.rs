//! # Application Configuration Loader
//!
//! Composition-root loader for every config section. Outside production it
//! first loads a dotenv file: `DOTENV_FILE` if set, else `.env.{APP_ENV}`,
//! else `.env`. Variables already in the environment win.
//!
//! ```rust,no_run
//! use ticket_desk::config::app::AppConfig;
//!
//! let cfg = AppConfig::from_env()?;
//! println!("listening on {}", cfg.http.bind_addr);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::env;

use anyhow::Result;

use crate::config::{auth::AuthConfig, csrf::CsrfConfig, db::DbConfig, web::HttpConfig};

pub const PRODUCTION: &str = "production";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `APP_ENV`, default `development`.
    pub app_env: String,
    pub auth: AuthConfig,
    pub csrf: CsrfConfig,
    pub db: DbConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Loads dotenv (outside production), then every section.
    ///
    /// Fails when `AUTH_SECRET` is missing or `HTTP_BIND` is malformed.
    pub fn from_env() -> Result<Self> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        if app_env != PRODUCTION {
            if let Ok(path) = env::var("DOTENV_FILE") {
                dotenvy::from_filename(&path).ok();
            } else if dotenvy::from_filename(format!(".env.{app_env}")).is_err() {
                dotenvy::dotenv().ok();
            }
        }

        Self::from_env_with(|k| env::var(k).ok())
    }

    /// Builds every section from `get` without touching dotenv files.
    pub fn from_env_with<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app_env: get("APP_ENV").unwrap_or_else(|| "development".into()),
            auth: AuthConfig::from_env_with(&get)?,
            csrf: CsrfConfig::from_env_with(&get),
            db: DbConfig::from_env_with(&get),
            http: HttpConfig::from_env_with(&get)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == PRODUCTION
    }
}
