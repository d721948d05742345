//! Enrollment ledger: enroll, unenroll, completions, resets, student views.
//!
//! `enroll` and `unenroll` gather the decision snapshot and apply the ledger
//! change inside one [`GatedTx`](crate::service::GatedTx), so no other writer
//! can move the counts between the check and the insert.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use roster_core::audit_detail::{CompletedDetail, EnrollmentDetail, ResetDetail};
use roster_core::eligibility::{
    Decision, StudentStanding, assess_course, decide_enroll, decide_unenroll,
};
use roster_core::entities::CompletedCourse;
use roster_core::enums::{AuditAction, EntityType};
use roster_core::ids::{CourseId, StudentId};
use roster_core::responses::{
    AvailableCourse, AvailableCourses, CompletedCourseView, CourseRef, EnrollOutcome,
    EnrollmentCount, ResetOutcome,
};

use crate::error::DatabaseError;
use crate::helpers::query_scalar;
use crate::repos::audit::append_audit;
use crate::repos::course::{SELECT_COLS as COURSE_COLS, load_course, load_seats, row_to_course};
use crate::repos::policy::load_policy;
use crate::repos::prerequisite::{load_edges, load_edges_for};
use crate::repos::student::{load_completed_views, load_student, load_student_by_registration};
use crate::service::RosterService;

const ENROLLED_MESSAGE: &str = "Successfully enrolled";
const UNENROLLED_MESSAGE: &str = "Successfully unenrolled";

async fn course_set(
    conn: &libsql::Connection,
    sql: &str,
    student_id: StudentId,
) -> Result<BTreeSet<CourseId>, DatabaseError> {
    let mut rows = conn.query(sql, [student_id]).await?;
    let mut out = BTreeSet::new();
    while let Some(row) = rows.next().await? {
        out.insert(row.get::<i64>(0)?);
    }
    Ok(out)
}

async fn load_enrolled_set(
    conn: &libsql::Connection,
    student_id: StudentId,
) -> Result<BTreeSet<CourseId>, DatabaseError> {
    course_set(
        conn,
        "SELECT course_id FROM enrollments WHERE student_id = ?1",
        student_id,
    )
    .await
}

async fn load_completed_set(
    conn: &libsql::Connection,
    student_id: StudentId,
) -> Result<BTreeSet<CourseId>, DatabaseError> {
    course_set(
        conn,
        "SELECT course_id FROM completed_courses WHERE student_id = ?1",
        student_id,
    )
    .await
}

/// Active enrollments and completions of one student.
pub(crate) async fn load_standing(
    conn: &libsql::Connection,
    student_id: StudentId,
) -> Result<StudentStanding, DatabaseError> {
    Ok(StudentStanding::new(
        load_enrolled_set(conn, student_id).await?,
        load_completed_set(conn, student_id).await?,
    ))
}

async fn active_count(
    conn: &libsql::Connection,
    student_id: StudentId,
) -> Result<u32, DatabaseError> {
    let n = query_scalar(
        conn,
        "SELECT COUNT(*) FROM enrollments WHERE student_id = ?1",
        [student_id],
    )
    .await?;
    u32::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("enrollment count {n}")))
}

fn outcome(
    decision: Decision,
    student_id: StudentId,
    course_id: CourseId,
    allowed_message: &str,
    enrollment_count: u32,
) -> EnrollOutcome {
    EnrollOutcome {
        allowed: decision.is_allowed(),
        reason: decision.reason(),
        message: decision
            .reason()
            .map_or_else(|| allowed_message.to_string(), |r| r.message().to_string()),
        student_id,
        course_id,
        enrollment_count,
    }
}

async fn load_available_courses(
    conn: &libsql::Connection,
    student_id: StudentId,
) -> Result<AvailableCourses, DatabaseError> {
    let student = load_student(conn, student_id).await?;
    let policy = load_policy(conn).await?;
    let standing = load_standing(conn, student_id).await?;
    let edges = load_edges(conn).await?;

    let mut rows = conn
        .query(
            &format!(
                "SELECT {COURSE_COLS} FROM courses WHERE department_id = ?1 ORDER BY course_code"
            ),
            [student.department_id],
        )
        .await?;
    let mut courses = Vec::new();
    while let Some(row) = rows.next().await? {
        courses.push(row_to_course(&row)?);
    }

    // Prerequisites may live in other departments; resolve them by id.
    let mut refs: BTreeMap<CourseId, CourseRef> = BTreeMap::new();
    let mut entries = Vec::with_capacity(courses.len());
    for course in courses {
        let seats = load_seats(conn, course.id).await?;
        let availability = assess_course(course.id, &standing, seats, &edges);
        let mut prerequisite_courses = Vec::with_capacity(availability.prerequisites.len());
        for &p in &availability.prerequisites {
            if !refs.contains_key(&p) {
                let c = load_course(conn, p).await?;
                refs.insert(
                    p,
                    CourseRef {
                        id: c.id,
                        course_code: c.course_code,
                        name: c.name,
                    },
                );
            }
            if let Some(r) = refs.get(&p) {
                prerequisite_courses.push(r.clone());
            }
        }
        entries.push(AvailableCourse {
            enrolled_count: seats.enrolled_count,
            course,
            prerequisite_courses,
            availability,
        });
    }

    let enrollment_count = u32::try_from(standing.active_count()).map_err(|_| {
        DatabaseError::InvalidState("enrollment count out of range".into())
    })?;
    Ok(AvailableCourses {
        student_id,
        registration_open: policy.registration_open,
        enrollment_count,
        max_courses_limit: policy.max_courses_limit,
        courses: entries,
    })
}

impl RosterService {
    /// `GetStudentEnrollments(student_id)`: courses with an active enrollment.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn student_enrollments(
        &self,
        student_id: StudentId,
    ) -> Result<BTreeSet<CourseId>, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        load_student(conn, student_id).await?;
        load_enrolled_set(conn, student_id).await
    }

    /// `GetStudentCompletedCourses(student_id)`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn student_completed_courses(
        &self,
        student_id: StudentId,
    ) -> Result<BTreeSet<CourseId>, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        load_student(conn, student_id).await?;
        load_completed_set(conn, student_id).await
    }

    /// Decide and, when allowed, insert the enrollment as one atomic unit.
    ///
    /// A denial is returned as `Ok` with `allowed: false`; only storage
    /// problems and unknown ids are errors.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown student or course, or a storage failure.
    pub async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<EnrollOutcome, DatabaseError> = async {
            load_student(&tx, student_id).await?;
            load_course(&tx, course_id).await?;
            let policy = load_policy(&tx).await?;
            let standing = load_standing(&tx, student_id).await?;
            let seats = load_seats(&tx, course_id).await?;
            let edges = load_edges_for(&tx, course_id).await?;
            tracing::debug!(student_id, course_id, ?seats, "enroll snapshot loaded");

            let decision = decide_enroll(course_id, &policy, &standing, seats, &edges);
            if decision.is_allowed() {
                tx.execute(
                    "INSERT INTO enrollments (student_id, course_id, status, created_at)
                     VALUES (?1, ?2, 'enrolled', ?3)",
                    libsql::params![student_id, course_id, Utc::now().to_rfc3339()],
                )
                .await
                .map_err(|e| DatabaseError::from_constraint(e, "enrollment rejected by storage"))?;
                let enrollment_id = tx.last_insert_rowid();
                append_audit(
                    &tx,
                    EntityType::Enrollment,
                    enrollment_id,
                    AuditAction::Enrolled,
                    Some(&EnrollmentDetail {
                        student_id,
                        course_id,
                    }),
                )
                .await?;
            }
            let count = active_count(&tx, student_id).await?;
            Ok(outcome(decision, student_id, course_id, ENROLLED_MESSAGE, count))
        }
        .await;
        let out = tx.finish(result).await?;
        match out.reason {
            None => tracing::info!(student_id, course_id, count = out.enrollment_count, "enrolled"),
            Some(reason) => tracing::info!(student_id, course_id, %reason, "enroll denied"),
        }
        Ok(out)
    }

    /// Decide and, when allowed, delete the enrollment as one atomic unit.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown student or course, or a storage failure.
    pub async fn unenroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<EnrollOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<EnrollOutcome, DatabaseError> = async {
            load_student(&tx, student_id).await?;
            load_course(&tx, course_id).await?;
            let standing = load_standing(&tx, student_id).await?;

            let decision = decide_unenroll(course_id, &standing);
            if decision.is_allowed() {
                let enrollment_id = query_scalar(
                    &tx,
                    "SELECT id FROM enrollments WHERE student_id = ?1 AND course_id = ?2",
                    [student_id, course_id],
                )
                .await?;
                tx.execute("DELETE FROM enrollments WHERE id = ?1", [enrollment_id])
                    .await?;
                append_audit(
                    &tx,
                    EntityType::Enrollment,
                    enrollment_id,
                    AuditAction::Unenrolled,
                    Some(&EnrollmentDetail {
                        student_id,
                        course_id,
                    }),
                )
                .await?;
            }
            let count = active_count(&tx, student_id).await?;
            Ok(outcome(decision, student_id, course_id, UNENROLLED_MESSAGE, count))
        }
        .await;
        let out = tx.finish(result).await?;
        match out.reason {
            None => tracing::info!(student_id, course_id, count = out.enrollment_count, "unenrolled"),
            Some(reason) => tracing::info!(student_id, course_id, %reason, "unenroll denied"),
        }
        Ok(out)
    }

    /// Record that a student completed a course.
    ///
    /// An active enrollment in the same course is removed in the same
    /// transaction, freeing the seat and the student's slot.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown ids, `Conflict` if the completion already exists.
    pub async fn record_completion(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<CompletedCourse, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<(CompletedCourse, bool), DatabaseError> = async {
            load_student(&tx, student_id).await?;
            load_course(&tx, course_id).await?;

            let now = Utc::now();
            tx.execute(
                "INSERT INTO completed_courses (student_id, course_id, completed_at)
                 VALUES (?1, ?2, ?3)",
                libsql::params![student_id, course_id, now.to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::from_constraint(e, "course already completed"))?;
            let id = tx.last_insert_rowid();
            let promoted = tx
                .execute(
                    "DELETE FROM enrollments WHERE student_id = ?1 AND course_id = ?2",
                    [student_id, course_id],
                )
                .await?
                > 0;
            append_audit(
                &tx,
                EntityType::CompletedCourse,
                id,
                AuditAction::Completed,
                Some(&CompletedDetail {
                    student_id,
                    course_id,
                    promoted,
                }),
            )
            .await?;
            Ok((
                CompletedCourse {
                    id,
                    student_id,
                    course_id,
                    completed_at: now,
                },
                promoted,
            ))
        }
        .await;
        let (completed, promoted) = tx.finish(result).await?;
        tracing::info!(student_id, course_id, promoted, "completion recorded");
        Ok(completed)
    }

    /// Completed courses with code and name.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn completed_courses(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<CompletedCourseView>, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        load_student(conn, student_id).await?;
        load_completed_views(conn, student_id).await
    }

    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn enrollment_count(
        &self,
        student_id: StudentId,
    ) -> Result<EnrollmentCount, DatabaseError> {
        let read = self.begin_read().await;
        let conn: &libsql::Connection = &read;
        load_student(conn, student_id).await?;
        let policy = load_policy(conn).await?;
        Ok(EnrollmentCount {
            enrollment_count: active_count(conn, student_id).await?,
            max_courses_limit: policy.max_courses_limit,
        })
    }

    /// Courses of the student's department with availability flags.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student has this id.
    pub async fn available_courses(
        &self,
        student_id: StudentId,
    ) -> Result<AvailableCourses, DatabaseError> {
        let snapshot = self.begin_snapshot().await?;
        let result = load_available_courses(&snapshot, student_id).await;
        snapshot.finish(result).await
    }

    /// Delete every active enrollment. Completions are kept.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn reset_enrollments(&self) -> Result<ResetOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<ResetOutcome, DatabaseError> = async {
            let removed = tx.execute("DELETE FROM enrollments", ()).await?;
            let out = ResetOutcome {
                removed,
                registration_number: None,
            };
            append_audit(
                &tx,
                EntityType::Enrollment,
                0,
                AuditAction::Reset,
                Some(&ResetDetail {
                    removed,
                    registration_number: None,
                }),
            )
            .await?;
            Ok(out)
        }
        .await;
        let out = tx.finish(result).await?;
        tracing::warn!(removed = out.removed, "all enrollments reset");
        Ok(out)
    }

    /// Delete the active enrollments of the student with this registration number.
    ///
    /// # Errors
    ///
    /// `NotFound` when no student has this registration number.
    pub async fn reset_student_enrollments(
        &self,
        registration_number: &str,
    ) -> Result<ResetOutcome, DatabaseError> {
        let tx = self.begin_write().await?;
        let result: Result<ResetOutcome, DatabaseError> = async {
            let student = load_student_by_registration(&tx, registration_number).await?;
            let removed = tx
                .execute("DELETE FROM enrollments WHERE student_id = ?1", [student.id])
                .await?;
            let detail = ResetDetail {
                removed,
                registration_number: Some(student.registration_number.clone()),
            };
            append_audit(&tx, EntityType::Student, student.id, AuditAction::Reset, Some(&detail))
                .await?;
            Ok(ResetOutcome {
                removed,
                registration_number: Some(student.registration_number),
            })
        }
        .await;
        let out = tx.finish(result).await?;
        tracing::info!(registration_number, removed = out.removed, "student enrollments reset");
        Ok(out)
    }
}
