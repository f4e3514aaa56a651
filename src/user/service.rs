//! # Account Actions
//!
//! Registration, login, and logout. Successful registration and login start
//! a session in the caller's [`SessionStore`]; logout ends it.

use std::sync::Arc;

use serde_json::json;

use crate::auth::password::{check_password, hash_password};
use crate::auth::session::SessionManager;
use crate::error::action::ActionError;
use crate::error::entity::AlreadyExistsError;
use crate::observe::{Event, EventRecorder, Severity};
use crate::session::store::SessionStore;
use crate::user::model::{
    Credentials, MSG_USER_EXISTS, NewUser, Registration, User, normalize_email,
};
use crate::user::store::UserStore;

const CATEGORY: &str = "auth";

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    sessions: SessionManager,
    recorder: Arc<dyn EventRecorder>,
}

impl UserService {
    pub fn new(
        store: Arc<dyn UserStore>,
        sessions: SessionManager,
        recorder: Arc<dyn EventRecorder>,
    ) -> Self {
        Self {
            store,
            sessions,
            recorder,
        }
    }

    /// Creates an account and signs the new user in.
    pub async fn register(
        &self,
        session: &mut dyn SessionStore,
        form: Registration,
    ) -> Result<User, ActionError> {
        let form = form
            .validate()
            .map_err(|m| ActionError::ValidationFailed(m.to_string()))?;

        let existing = self
            .store
            .find_by_email(&form.email)
            .await
            .map_err(|e| self.failure("Error looking up user", e))?;
        if existing.is_some() {
            return Err(ActionError::ValidationFailed(MSG_USER_EXISTS.into()));
        }

        let password = form.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| self.failure("Password hashing did not complete", e.into()))?
            .map_err(|e| self.failure("Password hashing failed", e))?;

        let user = self
            .store
            .create(NewUser {
                name: form.name,
                email: form.email,
                password_hash,
            })
            .await
            .map_err(|e| {
                // Lost a race with a concurrent registration.
                if e.downcast_ref::<AlreadyExistsError>().is_some() {
                    ActionError::ValidationFailed(MSG_USER_EXISTS.into())
                } else {
                    self.failure("Error creating user", e)
                }
            })?;

        self.sign_in(session, &user)?;
        self.recorder.record(
            Event::new(Severity::Info, CATEGORY, "User registered")
                .with_context(json!({ "subjectId": user.id })),
        );
        Ok(user)
    }

    /// Verifies credentials and signs the user in.
    ///
    /// An unknown email and a wrong password fail the same way.
    pub async fn login(
        &self,
        session: &mut dyn SessionStore,
        credentials: Credentials,
    ) -> Result<User, ActionError> {
        let email = credentials
            .email
            .as_deref()
            .map(normalize_email)
            .unwrap_or_default();
        let password = credentials.password.unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(ActionError::InvalidCredentials);
        }

        let user = self
            .store
            .find_by_email(&email)
            .await
            .map_err(|e| self.failure("Error looking up user", e))?;

        // Unknown emails still pay for a verification.
        let stored = user.as_ref().map(|u| u.password_hash.clone());
        let matches =
            tokio::task::spawn_blocking(move || check_password(stored.as_deref(), &password))
                .await
                .map_err(|e| self.failure("Password check did not complete", e.into()))?;

        let user = match user {
            Some(user) if matches => user,
            Some(_) => {
                self.reject("wrong password");
                return Err(ActionError::InvalidCredentials);
            }
            None => {
                self.reject("unknown email");
                return Err(ActionError::InvalidCredentials);
            }
        };

        self.sign_in(session, &user)?;
        self.recorder.record(
            Event::new(Severity::Info, CATEGORY, "User logged in")
                .with_context(json!({ "subjectId": user.id })),
        );
        Ok(user)
    }

    /// Ends the caller's session. Safe to call without one.
    pub fn logout(&self, session: &mut dyn SessionStore) {
        self.sessions.end(session);
    }

    fn sign_in(&self, session: &mut dyn SessionStore, user: &User) -> Result<(), ActionError> {
        self.sessions
            .start(session, &user.id)
            .map_err(|e| ActionError::Storage(e.into()))
    }

    fn reject(&self, reason: &str) {
        self.recorder.record(
            Event::new(Severity::Warning, CATEGORY, "Login rejected")
                .with_context(json!({ "reason": reason })),
        );
    }

    fn failure(&self, message: &str, err: anyhow::Error) -> ActionError {
        self.recorder.record(Event::new(Severity::Error, CATEGORY, message).with_error(&err));
        ActionError::Storage(err)
    }
}
