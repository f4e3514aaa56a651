use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::principal::SubjectId;
use crate::error::entity::AlreadyExistsError;
use crate::time::clock::Clock;
use crate::user::model::{NewUser, User};

/// Account persistence.
///
/// Emails are compared in their normalized (lowercase) form. `create` fails
/// with [`AlreadyExistsError`] when the email is taken.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// A [`UserStore`] held in process memory, keyed by email.
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            clock,
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(AlreadyExistsError::new("User", "email", &user.email).into());
        }

        let created = User {
            id: SubjectId::new(Uuid::now_v7().to_string()),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: self.clock.now(),
        };
        users.insert(created.email.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }
}
