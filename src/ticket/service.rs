//! # Ticket Actions
//!
//! Create, list, view, and close tickets on behalf of a resolved
//! [`Identity`]. Every action passes through the authorization gate and
//! reports its outcome to the [`EventRecorder`].
//!
//! Single-ticket actions check in this order, stopping at the first denial:
//! 1. authentication (before any store access)
//! 2. existence
//! 3. ownership

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::auth::gate::{self, Decision};
use crate::auth::principal::Identity;
use crate::error::action::ActionError;
use crate::observe::{Event, EventRecorder, Severity};
use crate::ticket::model::{Ticket, TicketDraft, TicketStatus};
use crate::ticket::store::TicketStore;

const CATEGORY: &str = "ticket";

#[derive(Clone)]
pub struct TicketService {
    store: Arc<dyn TicketStore>,
    recorder: Arc<dyn EventRecorder>,
}

impl TicketService {
    pub fn new(store: Arc<dyn TicketStore>, recorder: Arc<dyn EventRecorder>) -> Self {
        Self { store, recorder }
    }

    /// Creates a ticket owned by the caller.
    ///
    /// Order: authentication, then field validation, then persistence.
    pub async fn create_ticket(
        &self,
        identity: &Identity,
        draft: TicketDraft,
    ) -> Result<Ticket, ActionError> {
        let owner = match (gate::authorize_create(identity), identity.subject()) {
            (Decision::Allowed, Some(owner)) => owner,
            (denied, _) => return Err(self.deny("create", None, identity, denied)),
        };

        let fields = match draft.validate() {
            Ok(fields) => fields,
            Err(message) => {
                self.recorder.record(
                    Event::new(
                        Severity::Warning,
                        CATEGORY,
                        "Validation Error: Missing ticket fields",
                    )
                    .with_context(json!({
                        "subjectId": owner,
                        "subject": draft.subject,
                        "priority": draft.priority,
                        "decision": Decision::ValidationFailed.as_str(),
                    })),
                );
                return Err(ActionError::ValidationFailed(message.to_string()));
            }
        };

        let ticket = self.store.create(owner, fields).await.map_err(|e| {
            self.storage_failure("An error occurred while creating the ticket", None, identity, e)
        })?;

        self.recorder.record(
            Event::new(
                Severity::Info,
                CATEGORY,
                format!("Ticket created successfully: {}", ticket.id),
            )
            .with_context(json!({
                "ticketId": ticket.id,
                "subjectId": owner,
                "decision": Decision::Allowed.as_str(),
            })),
        );
        Ok(ticket)
    }

    /// Lists the caller's tickets, newest first.
    ///
    /// Anonymous callers get an empty list. A storage failure is logged and
    /// also yields an empty list.
    pub async fn list_tickets(&self, identity: &Identity) -> Vec<Ticket> {
        let Some(owner) = gate::list_scope(identity) else {
            return Vec::new();
        };

        match self.store.find_by_owner(owner).await {
            Ok(tickets) => {
                self.recorder.record(
                    Event::new(Severity::Info, CATEGORY, "Fetched ticket list").with_context(
                        json!({ "subjectId": owner, "count": tickets.len() }),
                    ),
                );
                tickets
            }
            Err(e) => {
                self.recorder.record(
                    Event::new(Severity::Error, CATEGORY, "Error fetching tickets")
                        .with_context(json!({ "subjectId": owner }))
                        .with_error(&e),
                );
                Vec::new()
            }
        }
    }

    /// Returns one ticket if the caller owns it.
    pub async fn view_ticket(&self, identity: &Identity, id: Uuid) -> Result<Ticket, ActionError> {
        self.authorized_target("view", identity, id).await
    }

    /// Marks a ticket closed. Closing a closed ticket succeeds unchanged.
    pub async fn close_ticket(&self, identity: &Identity, id: Uuid) -> Result<Ticket, ActionError> {
        let ticket = self.authorized_target("close", identity, id).await?;
        if ticket.status == TicketStatus::Closed {
            self.recorder.record(
                Event::new(Severity::Info, CATEGORY, format!("Ticket already closed: {id}"))
                    .with_context(json!({
                        "ticketId": id,
                        "subjectId": identity.subject(),
                        "decision": Decision::Allowed.as_str(),
                        "changed": false,
                    })),
            );
            return Ok(ticket);
        }

        let closed = self
            .store
            .update_status(id, TicketStatus::Closed)
            .await
            .map_err(|e| {
                self.storage_failure(
                    "An error occurred while closing the ticket",
                    Some(id),
                    identity,
                    e,
                )
            })?;

        self.recorder.record(
            Event::new(Severity::Info, CATEGORY, format!("Ticket closed: {id}")).with_context(
                json!({
                    "ticketId": id,
                    "subjectId": identity.subject(),
                    "decision": Decision::Allowed.as_str(),
                }),
            ),
        );
        Ok(closed)
    }

    /// Runs the auth → existence → ownership sequence for ticket `id`.
    async fn authorized_target(
        &self,
        action: &'static str,
        identity: &Identity,
        id: Uuid,
    ) -> Result<Ticket, ActionError> {
        if let Err(denied) = gate::require_subject(identity) {
            return Err(self.deny(action, Some(id), identity, denied));
        }

        let target = self.store.find_by_id(id).await.map_err(|e| {
            self.storage_failure(
                "An error occurred while loading the ticket",
                Some(id),
                identity,
                e,
            )
        })?;

        match gate::authorize_owned(identity, target.as_ref()) {
            Decision::Allowed => target.ok_or(ActionError::NotFound),
            denied => Err(self.deny(action, Some(id), identity, denied)),
        }
    }

    fn deny(
        &self,
        action: &'static str,
        ticket_id: Option<Uuid>,
        identity: &Identity,
        decision: Decision,
    ) -> ActionError {
        self.recorder.record(
            Event::new(Severity::Warning, CATEGORY, format!("Ticket {action} denied"))
                .with_context(json!({
                    "ticketId": ticket_id,
                    "subjectId": identity.subject(),
                    "decision": decision.as_str(),
                })),
        );
        ActionError::from_decision(decision).unwrap_or(ActionError::Forbidden)
    }

    fn storage_failure(
        &self,
        message: &str,
        ticket_id: Option<Uuid>,
        identity: &Identity,
        err: anyhow::Error,
    ) -> ActionError {
        self.recorder.record(
            Event::new(Severity::Error, CATEGORY, message)
                .with_context(json!({
                    "ticketId": ticket_id,
                    "subjectId": identity.subject(),
                }))
                .with_error(&err),
        );
        ActionError::Storage(err)
    }
}
