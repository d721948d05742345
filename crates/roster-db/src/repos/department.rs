//! Department repository.

use chrono::Utc;
use roster_core::entities::Department;
use roster_core::enums::{AuditAction, EntityType};
use roster_core::ids::DepartmentId;
use roster_core::responses::DeleteOutcome;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, query_scalar};
use crate::repos::audit::{NO_DETAIL, append_audit};
use crate::service::RosterService;

const SELECT_COLS: &str = "id, name, created_at";

fn row_to_department(row: &libsql::Row) -> Result<Department, DatabaseError> {
    Ok(Department {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

fn validate_name(name: &str) -> Result<&str, DatabaseError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DatabaseError::InvalidInput(
            "department name must not be empty".into(),
        ));
    }
    Ok(name)
}

pub(crate) async fn load_department(
    conn: &libsql::Connection,
    id: DepartmentId,
) -> Result<Department, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM departments WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Department, id))?;
    row_to_department(&row)
}

impl RosterService {
    /// # Errors
    ///
    /// `InvalidInput` for a blank name, `Conflict` when the name is taken.
    pub async fn create_department(&self, name: &str) -> Result<Department, DatabaseError> {
        let name = validate_name(name)?;
        let tx = self.begin_write().await?;
        let result: Result<Department, DatabaseError> = async {
            let now = Utc::now();
            tx.execute(
                "INSERT INTO departments (name, created_at) VALUES (?1, ?2)",
                libsql::params![name, now.to_rfc3339()],
            )
            .await
            .map_err(|e| {
                DatabaseError::from_constraint(e, &format!("department '{name}' already exists"))
            })?;
            let id = tx.last_insert_rowid();
            append_audit(&tx, EntityType::Department, id, AuditAction::Created, NO_DETAIL).await?;
            Ok(Department {
                id,
                name: name.to_string(),
                created_at: now,
            })
        }
        .await;
        let department = tx.finish(result).await?;
        tracing::info!(id = department.id, name = %department.name, "department created");
        Ok(department)
    }

    /// # Errors
    ///
    /// `NotFound` when no department has this id.
    pub async fn get_department(&self, id: DepartmentId) -> Result<Department, DatabaseError> {
        load_department(&*self.begin_read().await, id).await
    }

    /// All departments ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError> {
        let read = self.begin_read().await;
        let mut rows = read
            .query(
                &format!("SELECT {SELECT_COLS} FROM departments ORDER BY name"),
                (),
            )
            .await?;
        let mut departments = Vec::new();
        while let Some(row) = rows.next().await? {
            departments.push(row_to_department(&row)?);
        }
        Ok(departments)
    }

    /// # Errors
    ///
    /// `NotFound`, `InvalidInput` for a blank name, `Conflict` when the name is taken.
    pub async fn rename_department(
        &self,
        id: DepartmentId,
        name: &str,
    ) -> Result<Department, DatabaseError> {
        let name = validate_name(name)?;
        let tx = self.begin_write().await?;
        let result: Result<Department, DatabaseError> = async {
            let before = load_department(&tx, id).await?;
            tx.execute(
                "UPDATE departments SET name = ?1 WHERE id = ?2",
                libsql::params![name, id],
            )
            .await
            .map_err(|e| {
                DatabaseError::from_constraint(e, &format!("department '{name}' already exists"))
            })?;
            append_audit(
                &tx,
                EntityType::Department,
                id,
                AuditAction::Updated,
                Some(&serde_json::json!({ "from": before.name, "to": name })),
            )
            .await?;
            Ok(Department {
                name: name.to_string(),
                ..before
            })
        }
        .await;
        tx.finish(result).await
    }

    /// Delete a department nobody references.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `Conflict` while any course or student belongs to it.
    pub async fn delete_department(&self, id: DepartmentId) -> Result<DeleteOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<DeleteOutcome, DatabaseError> = async {
            load_department(&tx, id).await?;
            let courses = query_scalar(
                &tx,
                "SELECT COUNT(*) FROM courses WHERE department_id = ?1",
                [id],
            )
            .await?;
            let students = query_scalar(
                &tx,
                "SELECT COUNT(*) FROM students WHERE department_id = ?1",
                [id],
            )
            .await?;
            if courses > 0 || students > 0 {
                return Err(DatabaseError::Conflict(format!(
                    "department {id} is referenced by {courses} course(s) and {students} student(s)"
                )));
            }
            tx.execute("DELETE FROM departments WHERE id = ?1", [id])
                .await?;
            append_audit(&tx, EntityType::Department, id, AuditAction::Deleted, NO_DETAIL).await?;
            Ok(DeleteOutcome {
                id,
                deleted: true,
                cascaded: 0,
            })
        }
        .await;
        tx.finish(result).await
    }
}
