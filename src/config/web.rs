//! # HTTP Server Configuration
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `HTTP_BIND` | Listen address | `127.0.0.1:3000` |
//! | `HTTP_MAX_BODY_BYTES` | Request body limit in bytes | from `HTTP_MAX_BODY_MB` |
//! | `HTTP_MAX_BODY_MB` | Request body limit in megabytes | `1` |

use std::net::SocketAddr;

use anyhow::{Context, Result};

use crate::config::env::read_u32_from;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
    pub max_body_bytes: usize,
}

impl HttpConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = get("HTTP_BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind_addr = bind
            .trim()
            .parse()
            .with_context(|| format!("HTTP_BIND `{bind}` is not a socket address"))?;

        let max_body_bytes = get("HTTP_MAX_BODY_BYTES")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or_else(|| read_u32_from(&get, "HTTP_MAX_BODY_MB", 1) as usize * 1024 * 1024);

        Ok(Self {
            bind_addr,
            max_body_bytes,
        })
    }
}
