//! Ticket routes. Every handler resolves the caller first, then delegates to
//! [`TicketService`](crate::ticket::service::TicketService).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::auth::gate;
use crate::auth::principal::Identity;
use crate::error::action::ActionError;
use crate::ticket::model::TicketDraft;
use crate::web::identity::CurrentIdentity;
use crate::web::response::{ActionFailure, success};
use crate::web::state::AppState;

/// `GET /tickets`: the caller's tickets, empty for anonymous callers.
pub async fn list_tickets(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Response {
    let tickets = state.tickets.list_tickets(&identity).await;
    Json(json!({ "success": true, "tickets": tickets })).into_response()
}

/// `POST /tickets`
pub async fn create_ticket(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    body: Result<Json<TicketDraft>, JsonRejection>,
) -> Response {
    // A missing or unreadable body validates as empty, after the auth check.
    let draft = body.map(|Json(d)| d).unwrap_or_default();

    match state.tickets.create_ticket(&identity, draft).await {
        Ok(ticket) => success(
            StatusCode::CREATED,
            "Ticket created successfully!",
            "ticket",
            &ticket,
        ),
        Err(e) => {
            ActionFailure::new(e, "An error occurred while creating the ticket").into_response()
        }
    }
}

/// `GET /tickets/{id}`
pub async fn view_ticket(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(raw_id): Path<String>,
) -> Response {
    let outcome = match Uuid::parse_str(&raw_id) {
        Ok(id) => state.tickets.view_ticket(&identity, id).await,
        Err(_) => Err(unknown_id(&identity)),
    };

    match outcome {
        Ok(ticket) => success(StatusCode::OK, "Ticket loaded", "ticket", &ticket),
        Err(e) => {
            ActionFailure::new(e, "An error occurred while loading the ticket").into_response()
        }
    }
}

/// `POST /tickets/{id}/close`
pub async fn close_ticket(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(raw_id): Path<String>,
) -> Response {
    let outcome = match Uuid::parse_str(&raw_id) {
        Ok(id) => state.tickets.close_ticket(&identity, id).await,
        Err(_) => Err(unknown_id(&identity)),
    };

    match outcome {
        Ok(ticket) => success(StatusCode::OK, "Ticket closed", "ticket", &ticket),
        Err(e) => {
            ActionFailure::new(e, "An error occurred while closing the ticket").into_response()
        }
    }
}

/// An id that cannot name any ticket: still unauthenticated before not-found.
fn unknown_id(identity: &Identity) -> ActionError {
    match gate::require_subject(identity) {
        Ok(_) => ActionError::NotFound,
        Err(_) => ActionError::Unauthenticated,
    }
}
