//! # roster-db
//!
//! libSQL storage for Roster: the catalog (departments, courses, prerequisite
//! edges), students, the enrollment ledger (active enrollments and completed
//! courses), the policy settings, and an append-only audit trail.
//!
//! [`service::RosterService`] is the entry point. Every ledger mutation runs
//! as one read-decide-write unit: an in-process write gate, an `IMMEDIATE`
//! libSQL transaction, and the eligibility engine from `roster-core` in
//! between the read and the write.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection. `:memory:` databases
/// exist per connection, so the connection is never recreated.
pub struct RosterDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl RosterDb {
    /// Open a local database at the given path, or `:memory:`.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        // PRAGMA busy_timeout echoes the new value as a row.
        let millis = busy_timeout.as_millis();
        conn.query(&format!("PRAGMA busy_timeout = {millis}"), ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;

        let roster_db = Self { db, conn };
        roster_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(roster_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Cheap round trip used by health checks.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot answer a query.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        helpers::query_scalar(&self.conn, "SELECT 1", ()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> RosterDb {
        RosterDb::open_local(":memory:", Duration::from_millis(100))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "departments",
            "courses",
            "prerequisites",
            "students",
            "enrollments",
            "completed_courses",
            "system_settings",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn capacity_trigger_exists() {
        let db = test_db().await;
        let mut rows = db
            .conn()
            .query(
                "SELECT name FROM sqlite_master WHERE type='trigger' AND name='enrollments_capacity_guard'",
                (),
            )
            .await
            .unwrap();
        assert!(rows.next().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_enabled() {
        let db = test_db().await;
        let on = helpers::query_scalar(db.conn(), "PRAGMA foreign_keys", ())
            .await
            .unwrap();
        assert_eq!(on, 1);
    }

    #[tokio::test]
    async fn ping_answers() {
        let db = test_db().await;
        db.ping().await.unwrap();
    }

    #[tokio::test]
    async fn file_backed_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.db");
        let path = path.to_str().unwrap();
        {
            let db = RosterDb::open_local(path, Duration::from_millis(100))
                .await
                .unwrap();
            db.conn()
                .execute(
                    "INSERT INTO departments (name, created_at) VALUES ('Physics', '2026-01-01 00:00:00')",
                    (),
                )
                .await
                .unwrap();
        }
        let db = RosterDb::open_local(path, Duration::from_millis(100))
            .await
            .unwrap();
        let n = helpers::query_scalar(db.conn(), "SELECT COUNT(*) FROM departments", ())
            .await
            .unwrap();
        assert_eq!(n, 1);
    }
}
