//! # Ticket Persistence Port
//!
//! [`TicketStore`] is the persistence collaborator consumed by the ticket
//! service. The service never issues queries itself; it calls these four
//! operations by contract.
//!
//! Implementations:
//! - [`InMemoryTicketStore`]: process-local, for tests and database-less runs
//! - [`SqlTicketStore`](crate::ticket::sql_store::SqlTicketStore): the [`Db`](crate::db::port::Db) port

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::principal::SubjectId;
use crate::error::entity::NotFoundError;
use crate::ticket::model::{NewTicket, Ticket, TicketStatus};
use crate::time::clock::Clock;

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persists a new open ticket owned by `owner_id`.
    ///
    /// The owner is written in the same operation as the ticket itself.
    async fn create(&self, owner_id: &SubjectId, fields: NewTicket) -> Result<Ticket>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>>;

    /// Returns tickets owned by `owner_id`, newest first.
    async fn find_by_owner(&self, owner_id: &SubjectId) -> Result<Vec<Ticket>>;

    /// Sets the status of ticket `id` and returns the updated ticket.
    ///
    /// Fails with [`NotFoundError`] if the ticket does not exist.
    async fn update_status(&self, id: Uuid, status: TicketStatus) -> Result<Ticket>;
}

/// A [`TicketStore`] held in process memory.
pub struct InMemoryTicketStore {
    tickets: RwLock<HashMap<Uuid, Ticket>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryTicketStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn create(&self, owner_id: &SubjectId, fields: NewTicket) -> Result<Ticket> {
        let ticket = Ticket {
            id: Uuid::now_v7(),
            subject: fields.subject,
            description: fields.description,
            priority: fields.priority,
            status: TicketStatus::Open,
            owner_id: owner_id.clone(),
            created_at: self.clock.now(),
        };

        self.tickets.write().await.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &SubjectId) -> Result<Vec<Ticket>> {
        let mut owned: Vec<Ticket> = self
            .tickets
            .read()
            .await
            .values()
            .filter(|t| &t.owner_id == owner_id)
            .cloned()
            .collect();

        // v7 ids are time-ordered, which breaks ties within one timestamp.
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn update_status(&self, id: Uuid, status: TicketStatus) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::new("Ticket", id))?;

        ticket.status = status;
        Ok(ticket.clone())
    }
}
