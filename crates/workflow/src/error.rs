use touchgrass_core::error::CoreError;
use touchgrass_core::types::EntityId;

/// Postgres error code for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Postgres error code for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// A referenced row does not exist.
    #[error("Referenced {entity} with id {id} does not exist")]
    Referential { entity: &'static str, id: EntityId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Stored data is invalid: {0}")]
    Invalid(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A foreign key a write may violate: constraint-name fragment, referenced
/// entity and the id that was supplied for it.
pub(crate) type Reference = (&'static str, &'static str, EntityId);

impl PersistenceError {
    /// Classify a failed insert or update.
    ///
    /// Foreign key violations are matched to `references` by constraint name
    /// (falling back to the first entry); unique violations become conflicts.
    pub(crate) fn from_write(err: sqlx::Error, references: &[Reference]) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default();
            match db_err.code().as_deref() {
                Some(FOREIGN_KEY_VIOLATION) => {
                    let matched = references
                        .iter()
                        .find(|(fragment, _, _)| constraint.contains(fragment))
                        .or_else(|| references.first());
                    if let Some(&(_, entity, id)) = matched {
                        return Self::Referential { entity, id };
                    }
                }
                Some(UNIQUE_VIOLATION) => {
                    return Self::Conflict(format!("Duplicate value violates {constraint}"));
                }
                _ => {}
            }
        }
        Self::Database(err)
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            CoreError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Invalid(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let err = PersistenceError::from_write(sqlx::Error::RowNotFound, &[]);
        assert_matches!(err, PersistenceError::Database(sqlx::Error::RowNotFound));
    }

    #[test]
    fn core_conflict_maps_to_conflict() {
        let err: PersistenceError = CoreError::Conflict("used -> active".into()).into();
        assert_matches!(err, PersistenceError::Conflict(msg) if msg == "used -> active");
    }

    #[test]
    fn core_not_found_keeps_entity() {
        let id = EntityId::new_v4();
        let err: PersistenceError = CoreError::NotFound { entity: "Ticket", id }.into();
        assert_matches!(err, PersistenceError::NotFound { entity: "Ticket", id: got } if got == id);
    }
}
