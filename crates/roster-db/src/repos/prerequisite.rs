//! Prerequisite edge repository.
//!
//! New edges are validated by `roster_core::prerequisites` inside the same
//! transaction as the insert.

use std::collections::BTreeSet;

use chrono::Utc;
use roster_core::eligibility::Decision;
use roster_core::entities::{Prerequisite, PrerequisiteEdge};
use roster_core::enums::{AuditAction, EntityType};
use roster_core::ids::{CourseId, PrerequisiteId};
use roster_core::enums::DenyReason;
use roster_core::prerequisites::{
    PrerequisiteGraph, validate_new_prerequisite, validate_new_prerequisite_strict,
};
use roster_core::responses::{DeleteOutcome, PrerequisiteOutcome};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::repos::audit::{NO_DETAIL, append_audit};
use crate::repos::course::load_course;
use crate::service::RosterService;

const SELECT_COLS: &str = "id, course_id, prerequisite_id, created_at";

fn row_to_prerequisite(row: &libsql::Row) -> Result<Prerequisite, DatabaseError> {
    Ok(Prerequisite {
        id: row.get(0)?,
        course_id: row.get(1)?,
        prerequisite_id: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

/// Every edge in the catalog.
pub(crate) async fn load_edges(
    conn: &libsql::Connection,
) -> Result<Vec<PrerequisiteEdge>, DatabaseError> {
    let mut rows = conn
        .query("SELECT course_id, prerequisite_id FROM prerequisites", ())
        .await?;
    let mut edges = Vec::new();
    while let Some(row) = rows.next().await? {
        edges.push(PrerequisiteEdge::new(row.get(0)?, row.get(1)?));
    }
    Ok(edges)
}

/// Edges whose `course_id` is `course`.
pub(crate) async fn load_edges_for(
    conn: &libsql::Connection,
    course: CourseId,
) -> Result<Vec<PrerequisiteEdge>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT course_id, prerequisite_id FROM prerequisites WHERE course_id = ?1",
            [course],
        )
        .await?;
    let mut edges = Vec::new();
    while let Some(row) = rows.next().await? {
        edges.push(PrerequisiteEdge::new(row.get(0)?, row.get(1)?));
    }
    Ok(edges)
}

impl RosterService {
    /// Add the edge `course_id -> prerequisite_id` if the validator allows it.
    ///
    /// Denials (`DirectCycle`, `DuplicatePrerequisite`, and `TransitiveCycle`
    /// in strict mode) come back as a denied outcome, not an error.
    ///
    /// # Errors
    ///
    /// `NotFound` when either course does not exist.
    pub async fn add_prerequisite(
        &self,
        course_id: CourseId,
        prerequisite_id: CourseId,
    ) -> Result<PrerequisiteOutcome, DatabaseError> {
        let strict = self.options().strict_cycle_check;
        let tx = self.begin_write().await?;
        let result: Result<PrerequisiteOutcome, DatabaseError> = async {
            load_course(&tx, course_id).await?;
            load_course(&tx, prerequisite_id).await?;

            let edges = load_edges(&tx).await?;
            let decision = if strict {
                validate_new_prerequisite_strict(course_id, prerequisite_id, &edges)
            } else {
                validate_new_prerequisite(course_id, prerequisite_id, &edges)
            };
            if let Decision::Deny(reason) = decision {
                if reason == DenyReason::TransitiveCycle {
                    let chain = PrerequisiteGraph::from_edges(&edges).required_for(prerequisite_id);
                    tracing::debug!(
                        course_id,
                        prerequisite_id,
                        ?chain,
                        "edge closes a prerequisite cycle"
                    );
                }
                return Ok(PrerequisiteOutcome::denied(reason));
            }

            let now = Utc::now();
            tx.execute(
                "INSERT INTO prerequisites (course_id, prerequisite_id, created_at)
                 VALUES (?1, ?2, ?3)",
                libsql::params![course_id, prerequisite_id, now.to_rfc3339()],
            )
            .await?;
            let id = tx.last_insert_rowid();
            let edge = PrerequisiteEdge::new(course_id, prerequisite_id);
            append_audit(&tx, EntityType::Prerequisite, id, AuditAction::Created, Some(&edge))
                .await?;
            Ok(PrerequisiteOutcome::added(Prerequisite {
                id,
                course_id,
                prerequisite_id,
                created_at: now,
            }))
        }
        .await;
        let outcome = tx.finish(result).await?;
        match outcome.reason {
            Some(reason) => {
                tracing::info!(course_id, prerequisite_id, %reason, "prerequisite edge denied");
            }
            None => tracing::info!(course_id, prerequisite_id, "prerequisite edge added"),
        }
        Ok(outcome)
    }

    /// Remove an edge by its id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no edge has this id.
    pub async fn remove_prerequisite(
        &self,
        id: PrerequisiteId,
    ) -> Result<DeleteOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<DeleteOutcome, DatabaseError> = async {
            let removed = tx
                .execute("DELETE FROM prerequisites WHERE id = ?1", [id])
                .await?;
            if removed == 0 {
                return Err(DatabaseError::not_found(EntityType::Prerequisite, id));
            }
            append_audit(&tx, EntityType::Prerequisite, id, AuditAction::Deleted, NO_DETAIL)
                .await?;
            Ok(DeleteOutcome {
                id,
                deleted: true,
                cascaded: 0,
            })
        }
        .await;
        tx.finish(result).await
    }

    /// # Errors
    ///
    /// `NotFound` when no edge has this id.
    pub async fn get_prerequisite(&self, id: PrerequisiteId) -> Result<Prerequisite, DatabaseError> {
        let read = self.begin_read().await;
        let mut rows = read
            .query(
                &format!("SELECT {SELECT_COLS} FROM prerequisites WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Prerequisite, id))?;
        row_to_prerequisite(&row)
    }

    /// All stored edges, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_prerequisites(&self) -> Result<Vec<Prerequisite>, DatabaseError> {
        let read = self.begin_read().await;
        let mut rows = read
            .query(
                &format!("SELECT {SELECT_COLS} FROM prerequisites ORDER BY id"),
                (),
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_prerequisite(&row)?);
        }
        Ok(out)
    }

    /// All `(course_id, prerequisite_id)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_prerequisite_edges(&self) -> Result<Vec<PrerequisiteEdge>, DatabaseError> {
        load_edges(&*self.begin_read().await).await
    }

    /// `GetCoursePrerequisites(course_id)`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no course has this id.
    pub async fn course_prerequisites(
        &self,
        course_id: CourseId,
    ) -> Result<BTreeSet<CourseId>, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        load_course(conn, course_id).await?;
        Ok(load_edges_for(conn, course_id)
            .await?
            .into_iter()
            .map(|e| e.prerequisite_id)
            .collect())
    }
}
