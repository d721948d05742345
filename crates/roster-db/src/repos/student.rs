//! Student repository.

use chrono::Utc;
use roster_core::entities::Student;
use roster_core::enums::{AuditAction, EntityType};
use roster_core::ids::{DepartmentId, StudentId};
use roster_core::responses::{
    CompletedCourseView, DeleteOutcome, EnrolledCourseView, StudentCourses, StudentInfo,
};
use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, query_scalar};
use crate::repos::audit::append_audit;
use crate::repos::department::load_department;
use crate::service::RosterService;
use crate::updates::SetClauses;
use crate::updates::student::StudentUpdate;

const SELECT_COLS: &str =
    "id, student_id, name, department_id, registration_number, semester, created_at";

/// Fields for a new student. `semester` falls back to the configured default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub department_id: DepartmentId,
    pub registration_number: String,
    #[serde(default)]
    pub semester: Option<String>,
}

fn row_to_student(row: &libsql::Row) -> Result<Student, DatabaseError> {
    Ok(Student {
        id: row.get(0)?,
        student_id: row.get(1)?,
        name: row.get(2)?,
        department_id: row.get(3)?,
        registration_number: row.get(4)?,
        semester: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn require_text(field: &str, value: &str) -> Result<(), DatabaseError> {
    if value.trim().is_empty() {
        return Err(DatabaseError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) async fn load_student(
    conn: &libsql::Connection,
    id: StudentId,
) -> Result<Student, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM students WHERE id = ?1"),
            [id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Student, id))?;
    row_to_student(&row)
}

pub(crate) async fn load_student_by_registration(
    conn: &libsql::Connection,
    registration_number: &str,
) -> Result<Student, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM students WHERE registration_number = ?1"),
            [registration_number],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Student, registration_number))?;
    row_to_student(&row)
}

pub(crate) async fn load_completed_views(
    conn: &libsql::Connection,
    id: StudentId,
) -> Result<Vec<CompletedCourseView>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT c.id, c.course_code, c.name, cc.completed_at
             FROM completed_courses cc JOIN courses c ON c.id = cc.course_id
             WHERE cc.student_id = ?1 ORDER BY c.course_code",
            [id],
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(CompletedCourseView {
            course_id: row.get(0)?,
            course_code: row.get(1)?,
            name: row.get(2)?,
            completed_at: parse_datetime(&row.get::<String>(3)?)?,
        });
    }
    Ok(out)
}

async fn load_enrolled_views(
    conn: &libsql::Connection,
    id: StudentId,
) -> Result<Vec<EnrolledCourseView>, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT c.id, c.course_code, c.name, e.created_at
             FROM enrollments e JOIN courses c ON c.id = e.course_id
             WHERE e.student_id = ?1 ORDER BY c.course_code",
            [id],
        )
        .await?;
    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        out.push(EnrolledCourseView {
            course_id: row.get(0)?,
            course_code: row.get(1)?,
            name: row.get(2)?,
            enrolled_at: parse_datetime(&row.get::<String>(3)?)?,
        });
    }
    Ok(out)
}

impl RosterService {
    /// # Errors
    ///
    /// `InvalidInput` for blank fields, `NotFound` for an unknown department,
    /// `Conflict` when `student_id` or `registration_number` is taken.
    pub async fn create_student(&self, new: &NewStudent) -> Result<Student, DatabaseError> {
        require_text("student_id", &new.student_id)?;
        require_text("name", &new.name)?;
        require_text("registration_number", &new.registration_number)?;
        let semester = new
            .semester
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.options().default_semester)
            .to_string();

        let tx = self.begin_write().await?;
        let result: Result<Student, DatabaseError> = async {
            load_department(&tx, new.department_id).await?;
            let now = Utc::now();
            tx.execute(
                "INSERT INTO students (student_id, name, department_id, registration_number, semester, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    new.student_id.trim(),
                    new.name.trim(),
                    new.department_id,
                    new.registration_number.trim(),
                    semester.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| {
                DatabaseError::from_constraint(
                    e,
                    "student id or registration number already exists",
                )
            })?;
            let id = tx.last_insert_rowid();
            append_audit(&tx, EntityType::Student, id, AuditAction::Created, Some(new)).await?;
            Ok(Student {
                id,
                student_id: new.student_id.trim().to_string(),
                name: new.name.trim().to_string(),
                department_id: new.department_id,
                registration_number: new.registration_number.trim().to_string(),
                semester,
                created_at: now,
            })
        }
        .await;
        let student = tx.finish(result).await?;
        tracing::info!(id = student.id, registration_number = %student.registration_number, "student created");
        Ok(student)
    }

    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn get_student(&self, id: StudentId) -> Result<Student, DatabaseError> {
        load_student(&*self.begin_read().await, id).await
    }

    /// # Errors
    ///
    /// `NotFound` when no student has this registration number.
    pub async fn find_student_by_registration_number(
        &self,
        registration_number: &str,
    ) -> Result<Student, DatabaseError> {
        load_student_by_registration(&*self.begin_read().await, registration_number).await
    }

    /// Student joined with the department name.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn student_info(&self, id: StudentId) -> Result<StudentInfo, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        let student = load_student(conn, id).await?;
        let department = load_department(conn, student.department_id).await?;
        Ok(StudentInfo {
            student,
            department_name: department.name,
        })
    }

    /// Students ordered by name, optionally restricted to one department.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_students(
        &self,
        department_id: Option<DepartmentId>,
    ) -> Result<Vec<Student>, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        let mut rows = match department_id {
            Some(d) => {
                conn.query(
                    &format!(
                        "SELECT {SELECT_COLS} FROM students WHERE department_id = ?1 ORDER BY name"
                    ),
                    [d],
                )
                .await?
            }
            None => {
                conn.query(
                    &format!("SELECT {SELECT_COLS} FROM students ORDER BY name"),
                    (),
                )
                .await?
            }
        };
        let mut students = Vec::new();
        while let Some(row) = rows.next().await? {
            students.push(row_to_student(&row)?);
        }
        Ok(students)
    }

    /// # Errors
    ///
    /// `NotFound`, `InvalidInput`, or `Conflict` when a unique identifier is taken.
    pub async fn update_student(
        &self,
        id: StudentId,
        update: &StudentUpdate,
    ) -> Result<Student, DatabaseError> {
        for (field, value) in [
            ("student_id", &update.student_id),
            ("name", &update.name),
            ("registration_number", &update.registration_number),
            ("semester", &update.semester),
        ] {
            if let Some(value) = value {
                require_text(field, value)?;
            }
        }

        let tx = self.begin_write().await?;
        let result: Result<Student, DatabaseError> = async {
            load_student(&tx, id).await?;

            let mut sets = SetClauses::default();
            if let Some(v) = &update.student_id {
                sets.push("student_id", v.trim().to_string());
            }
            if let Some(v) = &update.name {
                sets.push("name", v.trim().to_string());
            }
            if let Some(department_id) = update.department_id {
                load_department(&tx, department_id).await?;
                sets.push("department_id", department_id);
            }
            if let Some(v) = &update.registration_number {
                sets.push("registration_number", v.trim().to_string());
            }
            if let Some(v) = &update.semester {
                sets.push("semester", v.trim().to_string());
            }

            if sets.is_empty() {
                return load_student(&tx, id).await;
            }

            let (sql, params) = sets.into_update("students", id);
            tx.execute(&sql, libsql::params_from_iter(params))
                .await
                .map_err(|e| {
                    DatabaseError::from_constraint(
                        e,
                        "student id or registration number already exists",
                    )
                })?;
            append_audit(&tx, EntityType::Student, id, AuditAction::Updated, Some(update)).await?;
            load_student(&tx, id).await
        }
        .await;
        tx.finish(result).await
    }

    /// Delete a student.
    ///
    /// Without `force`, a student with enrollments or completions is a
    /// `Conflict`. With `force`, those ledger rows go too.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `Conflict` as described.
    pub async fn delete_student(
        &self,
        id: StudentId,
        force: bool,
    ) -> Result<DeleteOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<DeleteOutcome, DatabaseError> = async {
            load_student(&tx, id).await?;
            let enrolled =
                query_scalar(&tx, "SELECT COUNT(*) FROM enrollments WHERE student_id = ?1", [id])
                    .await?;
            let completed = query_scalar(
                &tx,
                "SELECT COUNT(*) FROM completed_courses WHERE student_id = ?1",
                [id],
            )
            .await?;
            if !force && (enrolled > 0 || completed > 0) {
                return Err(DatabaseError::Conflict(format!(
                    "student {id} has {enrolled} enrollment(s) and {completed} completion(s); use force to delete"
                )));
            }
            let mut cascaded = tx
                .execute("DELETE FROM enrollments WHERE student_id = ?1", [id])
                .await?;
            cascaded += tx
                .execute("DELETE FROM completed_courses WHERE student_id = ?1", [id])
                .await?;
            tx.execute("DELETE FROM students WHERE id = ?1", [id]).await?;
            append_audit(
                &tx,
                EntityType::Student,
                id,
                AuditAction::Deleted,
                Some(&serde_json::json!({ "force": force, "ledger_rows_removed": cascaded })),
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
        tracing::info!(id, force, cascaded = outcome.cascaded, "student deleted");
        Ok(outcome)
    }

    /// Completed and active courses of a student.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn student_courses(&self, id: StudentId) -> Result<StudentCourses, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        let student = load_student(conn, id).await?;
        Ok(StudentCourses {
            student,
            completed: load_completed_views(conn, id).await?,
            enrolled: load_enrolled_views(conn, id).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{seed_course, seed_department, seed_student, test_service};
    use crate::updates::student::StudentUpdateBuilder;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn semester_defaults_to_first() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        let id = seed_student(&svc, d, "1").await;
        assert_eq!(svc.get_student(id).await.unwrap().semester, "first");
    }

    #[tokio::test]
    async fn duplicate_registration_number_conflicts() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        seed_student(&svc, d, "1").await;
        let err = svc
            .create_student(&NewStudent {
                student_id: "other".into(),
                name: "Other".into(),
                department_id: d,
                registration_number: "REG-1".into(),
                semester: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn info_includes_department_name() {
        let svc = test_service().await;
        let d = seed_department(&svc, "Computer Science").await;
        let id = seed_student(&svc, d, "1").await;
        let info = svc.student_info(id).await.unwrap();
        assert_eq!(info.department_name, "Computer Science");
        assert_eq!(info.student.registration_number, "REG-1");
    }

    #[tokio::test]
    async fn update_changes_fields() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        let id = seed_student(&svc, d, "1").await;
        let update = StudentUpdateBuilder::new()
            .name("Renamed")
            .semester("third")
            .build();
        let s = svc.update_student(id, &update).await.unwrap();
        assert_eq!(s.name, "Renamed");
        assert_eq!(s.semester, "third");
    }

    #[tokio::test]
    async fn lookup_by_registration_number() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        let id = seed_student(&svc, d, "7").await;
        let s = svc.find_student_by_registration_number("REG-7").await.unwrap();
        assert_eq!(s.id, id);
        assert!(matches!(
            svc.find_student_by_registration_number("nope").await.unwrap_err(),
            DatabaseError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn delete_with_ledger_rows_needs_force() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        let c = seed_course(&svc, d, "CS101", 5).await;
        let s = seed_student(&svc, d, "1").await;
        assert!(svc.enroll(s, c).await.unwrap().allowed);

        let err = svc.delete_student(s, false).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));

        let out = svc.delete_student(s, true).await.unwrap();
        assert_eq!(out.cascaded, 1);
        assert_eq!(svc.course_enrollment_count(c).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_without_ledger_rows() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        let s = seed_student(&svc, d, "1").await;
        let out = svc.delete_student(s, false).await.unwrap();
        assert_eq!(out.cascaded, 0);
        assert!(svc.list_students(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn courses_lists_completed_and_enrolled() {
        let svc = test_service().await;
        let d = seed_department(&svc, "CS").await;
        let a = seed_course(&svc, d, "CS101", 5).await;
        let b = seed_course(&svc, d, "CS201", 5).await;
        let s = seed_student(&svc, d, "1").await;
        svc.record_completion(s, a).await.unwrap();
        svc.enroll(s, b).await.unwrap();

        let courses = svc.student_courses(s).await.unwrap();
        assert_eq!(courses.completed.len(), 1);
        assert_eq!(courses.completed[0].course_code, "CS101");
        assert_eq!(courses.enrolled.len(), 1);
        assert_eq!(courses.enrolled[0].course_id, b);
    }
}
