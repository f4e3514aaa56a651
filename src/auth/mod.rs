//! # Session authentication and resource authorization
//!
//! - [`token`]: signs/verifies session claims (HS256 JWT, 7-day lifetime)
//! - [`principal`]: [`SubjectId`] and the [`Identity`] sum type
//! - [`resolver`]: session store → [`Identity`], failures collapse to anonymous
//! - [`session`]: starts and ends sessions
//! - [`gate`]: ownership-based [`Decision`]s
//! - [`password`]: Argon2 password hashing

pub mod gate;
pub mod password;
pub mod principal;
pub mod resolver;
pub mod session;
pub mod token;

pub use gate::{Decision, Owned};
pub use principal::{Identity, SubjectId};
pub use resolver::SessionResolver;
pub use session::SessionManager;
pub use token::{SessionClaims, TokenCodec, TokenError};
