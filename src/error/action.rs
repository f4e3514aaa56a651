//! # Action Outcomes
//!
//! User-facing operations (ticket and account actions) fail with
//! [`ActionError`]. Surfaces translate it into an operation-specific
//! [`ActionResult`] rather than letting errors cross the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::gate::Decision;

/// Why a user-facing action did not complete.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("you must be signed in")]
    Unauthenticated,
    #[error("you are not allowed to access this resource")]
    Forbidden,
    #[error("resource not found")]
    NotFound,
    #[error("{0}")]
    ValidationFailed(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Persistence or signing failure. Never retried or masked as a denial.
    #[error("operation failed")]
    Storage(#[source] anyhow::Error),
}

impl ActionError {
    /// Converts a denying gate decision into an error.
    ///
    /// `Allowed` has no error form and maps to `None`.
    pub fn from_decision(decision: Decision) -> Option<Self> {
        match decision {
            Decision::Allowed => None,
            Decision::Unauthenticated => Some(Self::Unauthenticated),
            Decision::Forbidden => Some(Self::Forbidden),
            Decision::NotFound => Some(Self::NotFound),
            Decision::ValidationFailed => {
                Some(Self::ValidationFailed("validation failed".into()))
            }
        }
    }

    /// The gate decision this error represents, if any.
    pub fn decision(&self) -> Option<Decision> {
        match self {
            Self::Unauthenticated => Some(Decision::Unauthenticated),
            Self::Forbidden => Some(Decision::Forbidden),
            Self::NotFound => Some(Decision::NotFound),
            Self::ValidationFailed(_) => Some(Decision::ValidationFailed),
            Self::InvalidCredentials | Self::Storage(_) => None,
        }
    }
}

/// Serializable `{ success, message }` outcome returned to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Builds the failure result for `err`.
    ///
    /// Storage failures use `fallback` (e.g. "An error occurred while
    /// creating the ticket") so internal details never reach the client.
    pub fn from_error(err: &ActionError, fallback: &str) -> Self {
        match err {
            ActionError::Storage(_) => Self::failure(fallback),
            other => Self::failure(capitalize(&other.to_string())),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
