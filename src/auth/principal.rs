use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of an authenticated principal (the token `sub` claim).
///
/// Its format is not interpreted at this layer: user stores mint it, tokens
/// carry it, and ownership checks compare it for equality.
///
/// ```rust
/// use ticket_desk::auth::SubjectId;
///
/// let id = SubjectId::new("user-123");
/// assert_eq!(id.as_str(), "user-123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The result of resolving the current request's session.
///
/// Resolution is all-or-nothing: a request is either backed by a valid,
/// unexpired, correctly signed token, or it is [`Identity::Anonymous`].
///
/// # Typical Usage
///
/// ```rust
/// use ticket_desk::auth::{Identity, SubjectId};
///
/// let who = Identity::authenticated("42");
/// assert_eq!(who.subject(), Some(&SubjectId::new("42")));
/// assert!(Identity::Anonymous.subject().is_none());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Identity {
    Authenticated {
        subject_id: SubjectId,
    },
    #[default]
    Anonymous,
}

impl Identity {
    pub fn authenticated(subject_id: impl Into<SubjectId>) -> Self {
        Self::Authenticated {
            subject_id: subject_id.into(),
        }
    }

    /// Returns the subject for an authenticated identity.
    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            Self::Authenticated { subject_id } => Some(subject_id),
            Self::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.subject().is_some()
    }
}
