//! Service layer serializing every mutation into one transactional unit.
//!
//! `RosterService` wraps `RosterDb` (raw database access) with a write gate
//! and the catalog options. All repo methods are implemented as
//! `impl RosterService` blocks under [`crate::repos`].

use std::ops::Deref;
use std::time::Duration;

use libsql::{Transaction, TransactionBehavior};
use roster_config::RosterConfig;
use roster_core::entities::Policy;
use roster_core::ids::DEFAULT_SEMESTER;
use tokio::sync::{Mutex, MutexGuard};

use crate::RosterDb;
use crate::error::DatabaseError;

/// Behavior switches that do not live in the database.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Reject prerequisite edges closing a cycle of any length.
    pub strict_cycle_check: bool,
    /// Semester assigned to students created without one.
    pub default_semester: String,
    /// Policy written to `system_settings` when the keys are missing.
    pub seed_policy: Policy,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            strict_cycle_check: false,
            default_semester: DEFAULT_SEMESTER.to_string(),
            seed_policy: Policy::default(),
        }
    }
}

impl From<&RosterConfig> for ServiceOptions {
    fn from(config: &RosterConfig) -> Self {
        Self {
            strict_cycle_check: config.catalog.strict_cycle_check,
            default_semester: config.catalog.default_semester.clone(),
            seed_policy: config.policy.seed(),
        }
    }
}

/// Orchestrates reads and transactional mutations.
///
/// Every mutation method follows this protocol:
/// 1. Acquire the write gate
/// 2. Begin an `IMMEDIATE` transaction
/// 3. Read the snapshot it needs and decide
/// 4. Execute SQL and append the audit entry (inside the transaction)
/// 5. Commit, or roll back on error
pub struct RosterService {
    db: RosterDb,
    write_gate: Mutex<()>,
    options: ServiceOptions,
}

impl RosterService {
    /// Open a local database and seed the policy settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, migrated, or
    /// seeded.
    pub async fn new_local(
        db_path: &str,
        busy_timeout: Duration,
        options: ServiceOptions,
    ) -> Result<Self, DatabaseError> {
        let db = RosterDb::open_local(db_path, busy_timeout).await?;
        Self::from_db(db, options).await
    }

    /// Open the database named by `config.database`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new_local`].
    pub async fn from_config(config: &RosterConfig) -> Result<Self, DatabaseError> {
        let path = config.database.path.to_str().ok_or_else(|| {
            DatabaseError::InvalidInput(format!(
                "database path is not valid UTF-8: {}",
                config.database.path.display()
            ))
        })?;
        Self::new_local(
            path,
            Duration::from_millis(config.database.busy_timeout_ms),
            ServiceOptions::from(config),
        )
        .await
    }

    /// Wrap an existing `RosterDb`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if seeding the policy settings fails.
    pub async fn from_db(db: RosterDb, options: ServiceOptions) -> Result<Self, DatabaseError> {
        options
            .seed_policy
            .validate()
            .map_err(|e| DatabaseError::InvalidInput(e.to_string()))?;
        let svc = Self {
            db,
            write_gate: Mutex::new(()),
            options,
        };
        svc.seed_policy().await?;
        Ok(svc)
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &RosterDb {
        &self.db
    }

    #[must_use]
    pub const fn options(&self) -> &ServiceOptions {
        &self.options
    }

    /// Acquire the write gate and open an `IMMEDIATE` transaction.
    pub(crate) async fn begin_write(&self) -> Result<GatedTx<'_>, DatabaseError> {
        self.begin(TransactionBehavior::Immediate).await
    }

    /// Acquire the write gate and open a `DEFERRED` transaction, for views
    /// assembled from several queries that must agree with each other.
    pub(crate) async fn begin_snapshot(&self) -> Result<GatedTx<'_>, DatabaseError> {
        self.begin(TransactionBehavior::Deferred).await
    }

    async fn begin(&self, behavior: TransactionBehavior) -> Result<GatedTx<'_>, DatabaseError> {
        let gate = self.write_gate.lock().await;
        let tx = self.db.conn().transaction_with_behavior(behavior).await?;
        Ok(GatedTx { tx, _gate: gate })
    }

    /// Acquire the write gate for a plain read.
    ///
    /// The connection is shared, so a read issued while a write transaction is
    /// open on it would see that transaction's uncommitted rows. Waiting on the
    /// gate keeps reads between transactions.
    pub(crate) async fn begin_read(&self) -> ReadGuard<'_> {
        let gate = self.write_gate.lock().await;
        ReadGuard {
            conn: self.db.conn(),
            _gate: gate,
        }
    }
}

/// A read holding the write gate. Dereferences to the shared connection.
pub(crate) struct ReadGuard<'a> {
    conn: &'a libsql::Connection,
    _gate: MutexGuard<'a, ()>,
}

impl Deref for ReadGuard<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        self.conn
    }
}

/// An open transaction holding the in-process write gate.
///
/// Dereferences to the transaction's connection so repo helpers taking
/// `&libsql::Connection` run inside it.
pub(crate) struct GatedTx<'a> {
    tx: Transaction,
    _gate: MutexGuard<'a, ()>,
}

impl GatedTx<'_> {
    /// Commit on `Ok`, roll back on `Err`, and hand back `result`.
    pub(crate) async fn finish<T>(
        self,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                self.tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(e)
            }
        }
    }
}

impl Deref for GatedTx<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &*self.tx
    }
}
