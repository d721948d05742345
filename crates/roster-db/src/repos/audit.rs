//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation.

use chrono::Utc;
use roster_core::entities::AuditEntry;
use roster_core::enums::{AuditAction, EntityType};
use serde::Serialize;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::RosterService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

/// `detail` argument for entries without a payload.
pub(crate) const NO_DETAIL: Option<&serde_json::Value> = None;

/// Append an audit entry on `conn`. Called by every mutation inside its
/// transaction.
pub(crate) async fn append_audit<D: Serialize>(
    conn: &libsql::Connection,
    entity_type: EntityType,
    entity_id: i64,
    action: AuditAction,
    detail: Option<&D>,
) -> Result<(), DatabaseError> {
    let detail = detail
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| DatabaseError::Other(e.into()))?;
    conn.execute(
        "INSERT INTO audit_trail (entity_type, entity_id, action, detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            entity_type.as_str(),
            entity_id,
            action.as_str(),
            detail,
            Utc::now().to_rfc3339()
        ],
    )
    .await?;
    Ok(())
}

fn row_to_audit(row: &libsql::Row) -> Result<AuditEntry, DatabaseError> {
    Ok(AuditEntry {
        id: row.get(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        detail: parse_optional_json(get_opt_string(row, 4)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl RosterService {
    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(
        &self,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(eid) = filter.entity_id {
            params.push(libsql::Value::Integer(eid));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY id DESC LIMIT {limit}"
        );

        let read = self.begin_read().await;
        let mut rows = read
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_audit(&row)?);
        }
        Ok(entries)
    }
}
