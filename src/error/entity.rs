use thiserror::Error;

/// A store-level error: the entity addressed by `id` does not exist.
///
/// Stores return it (inside `anyhow::Error`) when an update targets a
/// missing row. Authorization never produces it; the gate reports absence
/// as [`Decision::NotFound`](crate::auth::Decision::NotFound) instead.
///
/// # Example
/// ```
/// use ticket_desk::error::entity::NotFoundError;
///
/// let err = NotFoundError::new("Ticket", "42");
/// assert_eq!(err.to_string(), "Ticket 42 not found");
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Name of the entity (e.g. `"Ticket"`, `"User"`)
    pub entity: &'static str,
    /// Identifier that was looked up
    pub id: String,
}

impl NotFoundError {
    pub fn new(entity: &'static str, id: impl ToString) -> Self {
        Self {
            entity,
            id: id.to_string(),
        }
    }
}

/// A store-level error: a row with the same unique key already exists.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{entity} with {field} `{value}` already exists")]
pub struct AlreadyExistsError {
    pub entity: &'static str,
    pub field: &'static str,
    pub value: String,
}

impl AlreadyExistsError {
    pub fn new(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_entity_and_id() {
        let err = NotFoundError::new("User", 7);
        assert_eq!(err.to_string(), "User 7 not found");
    }

    #[test]
    fn can_be_recovered_from_anyhow() {
        let err: anyhow::Error = NotFoundError::new("Ticket", "abc").into();

        let inner = err.downcast_ref::<NotFoundError>().expect("downcast");
        assert_eq!(inner.entity, "Ticket");
        assert_eq!(inner.id, "abc");
    }

    #[test]
    fn already_exists_names_the_key() {
        let err = AlreadyExistsError::new("User", "email", "a@b.c");
        assert_eq!(err.to_string(), "User with email `a@b.c` already exists");
    }
}
