//! Database-specific error types and conversions.

use roster_core::error::RosterError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    pub(crate) fn not_found(entity: &str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<DbError> for RosterError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => RosterError::NotFound { entity, id },
            other => RosterError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_survives_conversion() {
        let err: RosterError = DbError::not_found("resource", "abc").into();
        assert!(matches!(
            err,
            RosterError::NotFound { ref entity, ref id } if entity == "resource" && id == "abc"
        ));
    }

    #[test]
    fn other_errors_become_database_errors() {
        let err: RosterError = DbError::Query("boom".into()).into();
        assert!(matches!(err, RosterError::Database(ref msg) if msg.contains("boom")));
    }
}
