//! # Database Configuration and Pool Factory
//!
//! - `DATABASE_URL`: MySQL URL. When absent the server runs on in-memory stores.
//! - `DATABASE_MAX_CONN`: optional upper bound on pooled connections

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use mysql::{Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: get("DATABASE_URL").filter(|s| !s.trim().is_empty()),
            max_connections: get("DATABASE_MAX_CONN").and_then(|s| s.trim().parse().ok()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

pub type DbPool = Arc<Pool>;

/// Opens a pool for `cfg.url`, bounded by `cfg.max_connections` when set.
pub fn create_pool(cfg: &DbConfig) -> Result<DbPool> {
    let url = cfg
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("DATABASE_URL is not set"))?;
    let mut builder = OptsBuilder::from_opts(Opts::from_url(url).context("invalid DATABASE_URL")?);

    if let Some(max) = cfg.max_connections {
        let constraints = PoolConstraints::new(1, max as usize)
            .ok_or_else(|| anyhow!("DATABASE_MAX_CONN must be at least 1"))?;
        builder = builder.pool_opts(PoolOpts::default().with_constraints(constraints));
    }

    let pool = Pool::new(builder).context("failed to open MySQL pool")?;
    Ok(Arc::new(pool))
}
