//! [`UserStore`] over the synchronous [`Db`] port.
//!
//! ```sql
//! CREATE TABLE users (
//!     id            CHAR(36)     NOT NULL PRIMARY KEY,
//!     name          VARCHAR(255) NOT NULL,
//!     email         VARCHAR(255) NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     created_at    DATETIME(6)  NOT NULL
//! );
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::SubsecRound;
use uuid::Uuid;

use crate::auth::principal::SubjectId;
use crate::db::blocking::run_blocking;
use crate::db::port::{Db, Row};
use crate::error::entity::AlreadyExistsError;
use crate::params;
use crate::time::clock::Clock;
use crate::user::model::{NewUser, User};
use crate::user::store::UserStore;

/// MySQL `ER_DUP_ENTRY`.
const DUPLICATE_ENTRY: u16 = 1062;

pub struct SqlUserStore {
    db: Arc<dyn Db>,
    clock: Arc<dyn Clock>,
}

impl SqlUserStore {
    pub fn new(db: Arc<dyn Db>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: SubjectId::new(row.get_string("id")?),
        name: row.get_string("name")?,
        email: row.get_string("email")?,
        password_hash: row.get_string("password_hash")?,
        created_at: row.get_datetime("created_at")?.and_utc(),
    })
}

fn is_duplicate_entry(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<mysql::Error>(),
        Some(mysql::Error::MySqlError(e)) if e.code == DUPLICATE_ENTRY
    )
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let created = User {
            id: SubjectId::new(Uuid::now_v7().to_string()),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: self.clock.now().trunc_subsecs(6),
        };

        let row = created.clone();
        run_blocking(&self.db, move |db| {
            let res = db.exec(
                "INSERT INTO users (id, name, email, password_hash, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
                &params![
                    row.id.as_str(),
                    &row.name,
                    &row.email,
                    &row.password_hash,
                    row.created_at.naive_utc(),
                ],
            );
            match res {
                Ok(_) => Ok(()),
                Err(e) if is_duplicate_entry(&e) => {
                    Err(AlreadyExistsError::new("User", "email", &row.email).into())
                }
                Err(e) => Err(e.context("insert user")),
            }
        })
        .await?;

        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        run_blocking(&self.db, move |db| {
            db.fetch_one(
                "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?",
                &params![&email],
            )
            .context("select user by email")?
            .as_ref()
            .map(user_from_row)
            .transpose()
        })
        .await
    }
}
