use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::principal::SubjectId;

/// A registered account. `id` is the subject carried in session tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: SubjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a user about to be persisted. `email` is already normalized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address";
pub const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MSG_USER_EXISTS: &str = "User already exists";

pub const MIN_PASSWORD_CHARS: usize = 6;

/// Registration form as submitted.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A registration that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    /// Name and email are trimmed and the email lowercased. The password is
    /// taken as-is.
    pub fn validate(&self) -> Result<ValidRegistration, &'static str> {
        let name = self.name.as_deref().map(str::trim).unwrap_or_default();
        let email = self.email.as_deref().map(str::trim).unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(MSG_FIELDS_REQUIRED);
        }
        if !email.contains('@') {
            return Err(MSG_INVALID_EMAIL);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(MSG_PASSWORD_TOO_SHORT);
        }

        Ok(ValidRegistration {
            name: name.to_string(),
            email: normalize_email(email),
            password: password.to_string(),
        })
    }
}

/// Login form as submitted.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
