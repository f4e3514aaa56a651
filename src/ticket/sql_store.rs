//! [`TicketStore`] over the synchronous [`Db`] port.
//!
//! Expected table:
//!
//! ```sql
//! CREATE TABLE tickets (
//!     id          CHAR(36)     NOT NULL PRIMARY KEY,
//!     subject     VARCHAR(255) NOT NULL,
//!     description TEXT         NOT NULL,
//!     priority    VARCHAR(16)  NOT NULL,
//!     status      VARCHAR(16)  NOT NULL,
//!     owner_id    VARCHAR(64)  NOT NULL,
//!     created_at  DATETIME(6)  NOT NULL,
//!     INDEX idx_tickets_owner (owner_id, created_at)
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
use crate::error::entity::NotFoundError;
use crate::params;
use crate::ticket::model::{NewTicket, Ticket, TicketStatus};
use crate::ticket::store::TicketStore;
use crate::time::clock::Clock;

const SELECT_COLUMNS: &str =
    "SELECT id, subject, description, priority, status, owner_id, created_at FROM tickets";

pub struct SqlTicketStore {
    db: Arc<dyn Db>,
    clock: Arc<dyn Clock>,
}

impl SqlTicketStore {
    pub fn new(db: Arc<dyn Db>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }
}

fn ticket_from_row(row: &Row) -> Result<Ticket> {
    let id = row.get_string("id")?;
    Ok(Ticket {
        id: Uuid::parse_str(&id).with_context(|| format!("tickets.id `{id}` is not a UUID"))?,
        subject: row.get_string("subject")?,
        description: row.get_string("description")?,
        priority: row.get_string("priority")?.parse().map_err(anyhow::Error::msg)?,
        status: row.get_string("status")?.parse().map_err(anyhow::Error::msg)?,
        owner_id: SubjectId::new(row.get_string("owner_id")?),
        created_at: row.get_datetime("created_at")?.and_utc(),
    })
}

fn select_by_id(db: &dyn Db, id: &str) -> Result<Option<Ticket>> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
    db.fetch_one(&sql, &params![id])?
        .as_ref()
        .map(ticket_from_row)
        .transpose()
}

#[async_trait]
impl TicketStore for SqlTicketStore {
    async fn create(&self, owner_id: &SubjectId, fields: NewTicket) -> Result<Ticket> {
        // DATETIME(6) keeps microseconds; truncate so the returned value
        // matches what a later read yields.
        let ticket = Ticket {
            id: Uuid::now_v7(),
            subject: fields.subject,
            description: fields.description,
            priority: fields.priority,
            status: TicketStatus::Open,
            owner_id: owner_id.clone(),
            created_at: self.clock.now().trunc_subsecs(6),
        };

        let row = ticket.clone();
        run_blocking(&self.db, move |db| {
            let id = row.id.to_string();
            db.exec(
                "INSERT INTO tickets \
                 (id, subject, description, priority, status, owner_id, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                &params![
                    &id,
                    &row.subject,
                    &row.description,
                    row.priority.as_str(),
                    row.status.as_str(),
                    row.owner_id.as_str(),
                    row.created_at.naive_utc(),
                ],
            )
            .context("insert ticket")
        })
        .await?;

        Ok(ticket)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>> {
        run_blocking(&self.db, move |db| select_by_id(db, &id.to_string())).await
    }

    async fn find_by_owner(&self, owner_id: &SubjectId) -> Result<Vec<Ticket>> {
        let owner = owner_id.clone();
        run_blocking(&self.db, move |db| {
            let sql =
                format!("{SELECT_COLUMNS} WHERE owner_id = ? ORDER BY created_at DESC, id DESC");
            db.fetch_all(&sql, &params![owner.as_str()])?
                .iter()
                .map(ticket_from_row)
                .collect()
        })
        .await
    }

    async fn update_status(&self, id: Uuid, status: TicketStatus) -> Result<Ticket> {
        run_blocking(&self.db, move |db| {
            let id = id.to_string();
            // MySQL reports zero affected rows when the value is unchanged,
            // so existence is decided by the read-back.
            db.exec(
                "UPDATE tickets SET status = ? WHERE id = ?",
                &params![status.as_str(), &id],
            )
            .context("update ticket status")?;

            select_by_id(db, &id)?.ok_or_else(|| NotFoundError::new("Ticket", &id).into())
        })
        .await
    }
}
