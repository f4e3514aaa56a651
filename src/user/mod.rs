//! Accounts: registration, login, and logout.

pub mod model;
pub mod service;
pub mod sql_store;
pub mod store;

pub use model::{Credentials, NewUser, Registration, User};
pub use service::UserService;
pub use sql_store::SqlUserStore;
pub use store::{InMemoryUserStore, UserStore};
