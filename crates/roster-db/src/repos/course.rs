//! Course repository: catalog CRUD, capacity reads, prerequisite and roster views.

use chrono::Utc;
use roster_core::eligibility::CourseSeats;
use roster_core::entities::Course;
use roster_core::enums::{AuditAction, EntityType};
use roster_core::ids::{CourseId, DepartmentId};
use roster_core::responses::{
    CoursePrerequisites, CourseRoster, DeleteOutcome, PrerequisiteDetail, RosterEntry,
};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_u32, parse_datetime, query_scalar};
use crate::repos::audit::append_audit;
use crate::repos::department::load_department;
use crate::service::RosterService;
use crate::updates::SetClauses;
use crate::updates::course::CourseUpdate;

pub(crate) const SELECT_COLS: &str =
    "id, course_code, name, department_id, max_students, semester, created_at";

/// Fields for a new course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCourse {
    pub course_code: String,
    pub name: String,
    pub department_id: DepartmentId,
    pub max_students: u32,
    #[serde(default)]
    pub semester: Option<String>,
}

pub(crate) fn row_to_course(row: &libsql::Row) -> Result<Course, DatabaseError> {
    Ok(Course {
        id: row.get(0)?,
        course_code: row.get(1)?,
        name: row.get(2)?,
        department_id: row.get(3)?,
        max_students: get_u32(row, 4)?,
        semester: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn require_text(field: &str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_capacity(max_students: u32) -> Result<(), DatabaseError> {
    if max_students == 0 {
        return Err(DatabaseError::InvalidInput(
            "max_students must be at least 1".into(),
        ));
    }
    Ok(())
}

pub(crate) async fn load_course(
    conn: &libsql::Connection,
    id: CourseId,
) -> Result<Course, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM courses WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Course, id))?;
    row_to_course(&row)
}

/// Capacity and current enrollment count of one course.
pub(crate) async fn load_seats(
    conn: &libsql::Connection,
    id: CourseId,
) -> Result<CourseSeats, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT max_students,
                    (SELECT COUNT(*) FROM enrollments WHERE course_id = ?1)
             FROM courses WHERE id = ?1",
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Course, id))?;
    Ok(CourseSeats {
        max_students: get_u32(&row, 0)?,
        enrolled_count: get_u32(&row, 1)?,
    })
}

impl RosterService {
    /// # Errors
    ///
    /// `InvalidInput` for blank fields or zero capacity, `NotFound` for an
    /// unknown department, `Conflict` when the course code is taken.
    pub async fn create_course(&self, new: &NewCourse) -> Result<Course, DatabaseError> {
        require_text("course_code", &new.course_code)?;
        require_text("name", &new.name)?;
        require_capacity(new.max_students)?;
        let code = new.course_code.trim();

        let tx = self.begin_write().await?;
        let result: Result<Course, DatabaseError> = async {
            load_department(&tx, new.department_id).await?;
            let now = Utc::now();
            tx.execute(
                "INSERT INTO courses (course_code, name, department_id, max_students, semester, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    code,
                    new.name.trim(),
                    new.department_id,
                    i64::from(new.max_students),
                    new.semester.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_constraint(e, &format!("course code '{code}' already exists")))?;
            let id = tx.last_insert_rowid();
            append_audit(&tx, EntityType::Course, id, AuditAction::Created, Some(new)).await?;
            Ok(Course {
                id,
                course_code: code.to_string(),
                name: new.name.trim().to_string(),
                department_id: new.department_id,
                max_students: new.max_students,
                semester: new.semester.clone(),
                created_at: now,
            })
        }
        .await;
        let course = tx.finish(result).await?;
        tracing::info!(id = course.id, code = %course.course_code, "course created");
        Ok(course)
    }

    /// # Errors
    ///
    /// `NotFound` when no course has this id.
    pub async fn get_course(&self, id: CourseId) -> Result<Course, DatabaseError> {
        load_course(&*self.begin_read().await, id).await
    }

    /// Courses ordered by code, optionally restricted to one department.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_courses(
        &self,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Course>, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        let mut rows = match department_id {
            Some(d) => {
                conn.query(
                    &format!(
                        "SELECT {SELECT_COLS} FROM courses WHERE department_id = ?1 ORDER BY course_code"
                    ),
                    [d],
                )
                .await?
            }
            None => {
                conn.query(
                    &format!("SELECT {SELECT_COLS} FROM courses ORDER BY course_code"),
                    (),
                )
                .await?
            }
        };
        let mut courses = Vec::new();
        while let Some(row) = rows.next().await? {
            courses.push(row_to_course(&row)?);
        }
        Ok(courses)
    }

    /// Apply the `Some` fields of `update`.
    ///
    /// Capacity cannot drop below the current enrollment count.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidInput`, or `Conflict` (code taken, capacity below
    /// current enrollments).
    pub async fn update_course(
        &self,
        id: CourseId,
        update: &CourseUpdate,
    ) -> Result<Course, DatabaseError> {
        if let Some(code) = &update.course_code {
            require_text("course_code", code)?;
        }
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if let Some(max) = update.max_students {
            require_capacity(max)?;
        }

        let tx = self.begin_write().await?;
        let result: Result<Course, DatabaseError> = async {
            load_course(&tx, id).await?;

            let mut sets = SetClauses::default();
            if let Some(code) = &update.course_code {
                sets.push("course_code", code.trim().to_string());
            }
            if let Some(name) = &update.name {
                sets.push("name", name.trim().to_string());
            }
            if let Some(department_id) = update.department_id {
                load_department(&tx, department_id).await?;
                sets.push("department_id", department_id);
            }
            if let Some(max) = update.max_students {
                let seats = load_seats(&tx, id).await?;
                if max < seats.enrolled_count {
                    return Err(DatabaseError::Conflict(format!(
                        "course {id} has {} active enrollments; capacity {max} is too small",
                        seats.enrolled_count
                    )));
                }
                sets.push("max_students", i64::from(max));
            }
            if let Some(semester) = &update.semester {
                sets.push("semester", semester.clone());
            }

            if sets.is_empty() {
                return load_course(&tx, id).await;
            }

            let (sql, params) = sets.into_update("courses", id);
            tx.execute(&sql, libsql::params_from_iter(params))
                .await
                .map_err(|e| DatabaseError::from_constraint(e, "course code already exists"))?;
            append_audit(&tx, EntityType::Course, id, AuditAction::Updated, Some(update)).await?;
            load_course(&tx, id).await
        }
        .await;
        tx.finish(result).await
    }

    /// Delete a course with no ledger rows, cascading its prerequisite edges.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `Conflict` while any enrollment or completion references it.
    pub async fn delete_course(&self, id: CourseId) -> Result<DeleteOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<DeleteOutcome, DatabaseError> = async {
            load_course(&tx, id).await?;
            let enrolled =
                query_scalar(&tx, "SELECT COUNT(*) FROM enrollments WHERE course_id = ?1", [id])
                    .await?;
            let completed = query_scalar(
                &tx,
                "SELECT COUNT(*) FROM completed_courses WHERE course_id = ?1",
                [id],
            )
            .await?;
            if enrolled > 0 || completed > 0 {
                return Err(DatabaseError::Conflict(format!(
                    "course {id} has {enrolled} enrollment(s) and {completed} completion(s)"
                )));
            }
            let cascaded = tx
                .execute(
                    "DELETE FROM prerequisites WHERE course_id = ?1 OR prerequisite_id = ?1",
                    [id],
                )
                .await?;
            tx.execute("DELETE FROM courses WHERE id = ?1", [id]).await?;
            append_audit(
                &tx,
                EntityType::Course,
                id,
                AuditAction::Deleted,
                Some(&serde_json::json!({ "prerequisites_removed": cascaded })),
            )
            .await?;
            Ok(DeleteOutcome {
                id,
                deleted: true,
                cascaded,
            })
        }
        .await;
        let outcome = tx.finish(result).await?;
        tracing::info!(id, cascaded = outcome.cascaded, "course deleted");
        Ok(outcome)
    }

    /// `GetCourseCapacity(course_id)`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no course has this id.
    pub async fn course_capacity(&self, id: CourseId) -> Result<u32, DatabaseError> {
        Ok(load_seats(&*self.begin_read().await, id).await?.max_students)
    }

    /// `GetCourseEnrollmentCount(course_id)`, across all students.
    ///
    /// # Errors
    ///
    /// `NotFound` when no course has this id.
    pub async fn course_enrollment_count(&self, id: CourseId) -> Result<u32, DatabaseError> {
        Ok(load_seats(&*self.begin_read().await, id).await?.enrolled_count)
    }

    /// A course with its direct prerequisites resolved to course details.
    ///
    /// # Errors
    ///
    /// `NotFound` when no course has this id.
    pub async fn course_prerequisite_details(
        &self,
        id: CourseId,
    ) -> Result<CoursePrerequisites, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        let course = load_course(conn, id).await?;
        let mut rows = conn
            .query(
                "SELECT p.id, p.prerequisite_id, c.course_code, c.name
                 FROM prerequisites p JOIN courses c ON c.id = p.prerequisite_id
                 WHERE p.course_id = ?1 ORDER BY c.course_code",
                [id],
            )
            .await?;
        let mut prerequisites = Vec::new();
        while let Some(row) = rows.next().await? {
            prerequisites.push(PrerequisiteDetail {
                id: row.get(0)?,
                prerequisite_id: row.get(1)?,
                course_code: row.get(2)?,
                name: row.get(3)?,
            });
        }
        Ok(CoursePrerequisites {
            course,
            prerequisites,
        })
    }

    /// A course with the students currently enrolled in it.
    ///
    /// # Errors
    ///
    /// `NotFound` when no course has this id.
    pub async fn course_roster(&self, id: CourseId) -> Result<CourseRoster, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        let course = load_course(conn, id).await?;
        let mut rows = conn
            .query(
                "SELECT s.id, s.student_id, s.name, s.registration_number, e.created_at
                 FROM enrollments e JOIN students s ON s.id = e.student_id
                 WHERE e.course_id = ?1 ORDER BY s.name",
                [id],
            )
            .await?;
        let mut students = Vec::new();
        while let Some(row) = rows.next().await? {
            students.push(RosterEntry {
                id: row.get(0)?,
                student_id: row.get(1)?,
                name: row.get(2)?,
                registration_number: row.get(3)?,
                enrolled_at: parse_datetime(&row.get::<String>(4)?)?,
            });
        }
        Ok(CourseRoster { course, students })
    }
}
