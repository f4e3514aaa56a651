//! # Environment Readers
//!
//! Flag and number readers used by the config loaders. Each has a `_from`
//! variant taking a provider closure, so loaders can be tested against a
//! plain map instead of the process environment.
//!
//! ```rust
//! use ticket_desk::config::env::{read_flag_from, read_u32_from};
//!
//! assert!(read_flag_from(|_| Some("yes".into()), "AUTH_COOKIE_SECURE", false));
//! assert_eq!(read_u32_from(|_| Some(" 8 ".into()), "DATABASE_MAX_CONN", 4), 8);
//! ```

/// Reads a flag from the process environment.
pub fn read_flag(name: &str, default: bool) -> bool {
    read_flag_from(|k| std::env::var(k).ok(), name, default)
}

/// Truthy values are `1`, `true`, `yes`, `on` in any case, optionally
/// quoted. Anything else present is `false`; absence yields `default`.
pub fn read_flag_from<F>(provider: F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match provider(name) {
        Some(v) => is_truthy(&v),
        None => default,
    }
}

pub fn read_u32(name: &str, default: u32) -> u32 {
    read_u32_from(|k| std::env::var(k).ok(), name, default)
}

/// Unparsable values fall back to `default`.
pub fn read_u32_from<F>(provider: F, name: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    provider(name)
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

pub fn is_truthy(raw: &str) -> bool {
    let s = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
