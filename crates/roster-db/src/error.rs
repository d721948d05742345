//! Database error types for roster-db.

use thiserror::Error;

/// Errors from database operations.
///
/// Everything except [`NotFound`](Self::NotFound), [`Conflict`](Self::Conflict)
/// and [`InvalidInput`](Self::InvalidInput) means the store itself failed and
/// is reported to callers as storage unavailable.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// The referenced entity does not exist.
    #[error("{entity_type} {id} not found")]
    NotFound { entity_type: String, id: String },

    /// A uniqueness rule or a dependent row blocks the operation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller-supplied value rejected before touching storage.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity_type: roster_core::enums::EntityType, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_str().to_string(),
            id: id.to_string(),
        }
    }

    /// Turn a UNIQUE/CHECK/trigger violation into a [`Conflict`](Self::Conflict)
    /// carrying `context`; pass every other error through.
    pub(crate) fn from_constraint(e: libsql::Error, context: &str) -> Self {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint failed")
            || msg.contains("CHECK constraint failed")
            || msg.contains("course_full")
        {
            Self::Conflict(context.to_string())
        } else {
            Self::LibSql(e)
        }
    }

    /// Whether this error is a storage failure rather than a caller mistake.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        !matches!(
            self,
            Self::NotFound { .. } | Self::Conflict(_) | Self::InvalidInput(_)
        )
    }
}
