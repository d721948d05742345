//! Policy store: the two global settings in `system_settings`.
//!
//! Values are read fresh on every decision and handed to the eligibility
//! engine as a [`Policy`] value.

use chrono::Utc;
use roster_core::audit_detail::PolicyChangedDetail;
use roster_core::entities::Policy;
use roster_core::enums::{AuditAction, EntityType};

use crate::error::DatabaseError;
use crate::helpers::query_scalar;
use crate::repos::audit::append_audit;
use crate::service::RosterService;

const KEY_REGISTRATION_OPEN: &str = "registration_open";
const KEY_MAX_COURSES_LIMIT: &str = "max_courses_limit";

/// Audit entity id used for policy rows (there is a single policy).
const POLICY_ENTITY_ID: i64 = 1;

async fn read_setting(
    conn: &libsql::Connection,
    key: &str,
) -> Result<Option<String>, DatabaseError> {
    let mut rows = conn
        .query("SELECT value FROM system_settings WHERE key = ?1", [key])
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get::<String>(0)?)),
        None => Ok(None),
    }
}

async fn write_setting(
    conn: &libsql::Connection,
    key: &str,
    value: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO system_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        libsql::params![key, value, Utc::now().to_rfc3339()],
    )
    .await?;
    Ok(())
}

/// Read the current policy on `conn`.
pub(crate) async fn load_policy(conn: &libsql::Connection) -> Result<Policy, DatabaseError> {
    let open = read_setting(conn, KEY_REGISTRATION_OPEN)
        .await?
        .ok_or_else(|| DatabaseError::InvalidState("registration_open is not set".into()))?;
    let limit = read_setting(conn, KEY_MAX_COURSES_LIMIT)
        .await?
        .ok_or_else(|| DatabaseError::InvalidState("max_courses_limit is not set".into()))?;

    let registration_open = match open.as_str() {
        "true" | "1" => true,
        "false" | "0" => false,
        other => {
            return Err(DatabaseError::InvalidState(format!(
                "registration_open has unexpected value '{other}'"
            )));
        }
    };
    let max_courses_limit = limit.trim().parse::<u32>().map_err(|e| {
        DatabaseError::InvalidState(format!("max_courses_limit '{limit}' is not a count: {e}"))
    })?;

    Policy::new(registration_open, max_courses_limit)
        .map_err(|e| DatabaseError::InvalidState(e.to_string()))
}

impl RosterService {
    /// Insert the seed policy for keys that do not exist yet.
    pub(crate) async fn seed_policy(&self) -> Result<(), DatabaseError> {
        let seed = self.options().seed_policy;
        let now = Utc::now().to_rfc3339();
        let tx = self.begin_write().await?;
        let result: Result<(), DatabaseError> = async {
            for (key, value) in [
                (KEY_REGISTRATION_OPEN, seed.registration_open.to_string()),
                (KEY_MAX_COURSES_LIMIT, seed.max_courses_limit.to_string()),
            ] {
                tx.execute(
                    "INSERT OR IGNORE INTO system_settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                    libsql::params![key, value, now.as_str()],
                )
                .await?;
            }
            Ok(())
        }
        .await;
        tx.finish(result).await
    }

    /// `GetPolicy()`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the stored settings are corrupt.
    pub async fn get_policy(&self) -> Result<Policy, DatabaseError> {
        load_policy(&*self.begin_read().await).await
    }

    /// Open or close registration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn set_registration_open(&self, open: bool) -> Result<Policy, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<Policy, DatabaseError> = async {
            let before = load_policy(&tx).await?;
            write_setting(&tx, KEY_REGISTRATION_OPEN, &open.to_string()).await?;
            append_audit(
                &tx,
                EntityType::Policy,
                POLICY_ENTITY_ID,
                AuditAction::PolicyChanged,
                Some(&PolicyChangedDetail {
                    setting: KEY_REGISTRATION_OPEN.into(),
                    from: before.registration_open.to_string(),
                    to: open.to_string(),
                }),
            )
            .await?;
            Ok(Policy {
                registration_open: open,
                ..before
            })
        }
        .await;
        let policy = tx.finish(result).await?;
        tracing::info!(registration_open = open, "registration status changed");
        Ok(policy)
    }

    /// Change the global max-courses limit.
    ///
    /// The limit may not drop below the largest active enrollment count of any
    /// student.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidInput` for a zero limit and
    /// `DatabaseError::Conflict` when some student holds more enrollments than
    /// `limit`.
    pub async fn set_max_courses_limit(&self, limit: u32) -> Result<Policy, DatabaseError> {
        if limit == 0 {
            return Err(DatabaseError::InvalidInput(
                "max_courses_limit must be at least 1".into(),
            ));
        }
        let tx = self.begin_write().await?;
        let result: Result<Policy, DatabaseError> = async {
            let before = load_policy(&tx).await?;
            let busiest = query_scalar(
                &tx,
                "SELECT COALESCE(MAX(cnt), 0) FROM \
                 (SELECT COUNT(*) AS cnt FROM enrollments GROUP BY student_id)",
                (),
            )
            .await?;
            if i64::from(limit) < busiest {
                return Err(DatabaseError::Conflict(format!(
                    "a student holds {busiest} active enrollments; limit {limit} is too small"
                )));
            }
            write_setting(&tx, KEY_MAX_COURSES_LIMIT, &limit.to_string()).await?;
            append_audit(
                &tx,
                EntityType::Policy,
                POLICY_ENTITY_ID,
                AuditAction::PolicyChanged,
                Some(&PolicyChangedDetail {
                    setting: KEY_MAX_COURSES_LIMIT.into(),
                    from: before.max_courses_limit.to_string(),
                    to: limit.to_string(),
                }),
            )
            .await?;
            Ok(Policy {
                max_courses_limit: limit,
                ..before
            })
        }
        .await;
        let policy = tx.finish(result).await?;
        tracing::info!(max_courses_limit = limit, "max courses limit changed");
        Ok(policy)
    }
}
