//! # Authorization Gate
//!
//! Pure decision functions over `(identity, target-or-absence)`.
//!
//! | Operation kind          | Anonymous          | Missing target | Other owner | Owner   |
//! |-------------------------|--------------------|----------------|-------------|---------|
//! | create                  | `Unauthenticated`  | n/a            | n/a         | allowed |
//! | list                    | empty scope        | n/a            | filtered    | scoped  |
//! | single-resource access  | `Unauthenticated`  | `NotFound`     | `Forbidden` | allowed |
//!
//! Checks run in a fixed order (authentication, then existence, then
//! ownership) so an anonymous caller never learns whether a resource exists.
//! Callers must therefore check authentication *before* fetching the target;
//! [`require_subject`] exists for that.

use serde::Serialize;

use crate::auth::principal::{Identity, SubjectId};

/// Outcome of an authorization check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Decision {
    Allowed,
    Unauthenticated,
    Forbidden,
    NotFound,
    ValidationFailed,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }

    /// Stable label for audit records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ValidationFailed => "validation_failed",
        }
    }
}

/// A resource bound to the identity that created it.
///
/// The owner is set at creation and never reassigned.
pub trait Owned {
    fn owner_id(&self) -> &SubjectId;
}

/// Returns the subject of an authenticated identity, or the
/// `Unauthenticated` decision.
pub fn require_subject(identity: &Identity) -> Result<&SubjectId, Decision> {
    identity.subject().ok_or(Decision::Unauthenticated)
}

/// Decision for create-type operations.
pub fn authorize_create(identity: &Identity) -> Decision {
    match require_subject(identity) {
        Ok(_) => Decision::Allowed,
        Err(denied) => denied,
    }
}

/// Owner filter for list-type operations.
///
/// `None` means the caller is anonymous and the result set must be empty.
pub fn list_scope(identity: &Identity) -> Option<&SubjectId> {
    identity.subject()
}

/// Decision for single-resource reads and mutations.
pub fn authorize_owned<R: Owned>(identity: &Identity, target: Option<&R>) -> Decision {
    let subject = match require_subject(identity) {
        Ok(subject) => subject,
        Err(denied) => return denied,
    };

    let Some(resource) = target else {
        return Decision::NotFound;
    };

    if resource.owner_id() != subject {
        return Decision::Forbidden;
    }

    Decision::Allowed
}
