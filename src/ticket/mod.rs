//! Support tickets: model, persistence, and the authorized actions on them.

pub mod model;
pub mod service;
pub mod sql_store;
pub mod store;

pub use model::{NewTicket, Priority, Ticket, TicketDraft, TicketStatus};
pub use service::TicketService;
pub use sql_store::SqlTicketStore;
pub use store::{InMemoryTicketStore, TicketStore};
