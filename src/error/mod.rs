//! Shared error types.

pub mod action;
pub mod entity;

pub use action::{ActionError, ActionResult};
pub use entity::{AlreadyExistsError, NotFoundError};
