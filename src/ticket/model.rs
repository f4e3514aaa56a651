use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::gate::Owned;
use crate::auth::principal::SubjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    /// Accepts `low`/`medium`/`high` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority `{other}`")),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            "Closed" => Ok(Self::Closed),
            other => Err(format!("unknown ticket status `{other}`")),
        }
    }
}

/// A support ticket.
///
/// `owner_id` is fixed at creation from the creating identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub subject: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub owner_id: SubjectId,
    pub created_at: DateTime<Utc>,
}

impl Owned for Ticket {
    fn owner_id(&self) -> &SubjectId {
        &self.owner_id
    }
}

/// Validated fields for a new ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTicket {
    pub subject: String,
    pub description: String,
    pub priority: Priority,
}

/// Raw, unvalidated ticket fields as submitted by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TicketDraft {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

pub const MSG_FIELDS_REQUIRED: &str = "All fields are required";
pub const MSG_INVALID_PRIORITY: &str = "Invalid priority";

impl TicketDraft {
    pub fn new(subject: &str, description: &str, priority: &str) -> Self {
        Self {
            subject: Some(subject.to_string()),
            description: Some(description.to_string()),
            priority: Some(priority.to_string()),
        }
    }

    /// Checks that every field is present and non-blank and that the priority
    /// is known. Text fields are trimmed.
    pub fn validate(&self) -> Result<NewTicket, &'static str> {
        let subject = non_blank(self.subject.as_deref());
        let description = non_blank(self.description.as_deref());
        let priority = non_blank(self.priority.as_deref());

        let (Some(subject), Some(description), Some(priority)) = (subject, description, priority)
        else {
            return Err(MSG_FIELDS_REQUIRED);
        };

        let priority = priority
            .parse::<Priority>()
            .map_err(|_| MSG_INVALID_PRIORITY)?;

        Ok(NewTicket {
            subject: subject.to_string(),
            description: description.to_string(),
            priority,
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
