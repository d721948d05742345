//! Embedded schema migrations, applied in order on every open.

use crate::RosterDb;
use crate::error::DatabaseError;

/// `(name, sql)` pairs. Statements are `IF NOT EXISTS`, so re-running is a no-op.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial",
    include_str!("../migrations/001_initial.sql"),
)];

impl RosterDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            self.conn
                .execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::debug!(migration = name, "applied");
        }
        Ok(())
    }
}
