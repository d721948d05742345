//! Response types returned as JSON by the HTTP API and the `rst` CLI.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::eligibility::Availability;
use crate::entities::{Course, Prerequisite, Student};
use crate::enums::DenyReason;
use crate::ids::{CourseId, PrerequisiteId, StudentId};

/// Wire shape of an enroll or unenroll decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EnrollDecision {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
}

/// Result of `enroll` / `unenroll` after the ledger mutation (if any).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EnrollOutcome {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
    pub message: String,
    pub student_id: StudentId,
    pub course_id: CourseId,
    /// The student's active enrollment count after the operation.
    pub enrollment_count: u32,
}

impl EnrollOutcome {
    #[must_use]
    pub const fn decision(&self) -> EnrollDecision {
        EnrollDecision {
            allowed: self.allowed,
            reason: self.reason,
        }
    }
}

/// Result of adding a prerequisite edge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PrerequisiteOutcome {
    pub allowed: bool,
    pub reason: Option<DenyReason>,
    pub message: String,
    /// The stored edge when `allowed`.
    pub prerequisite: Option<Prerequisite>,
}

impl PrerequisiteOutcome {
    #[must_use]
    pub fn added(prerequisite: Prerequisite) -> Self {
        Self {
            allowed: true,
            reason: None,
            message: "Prerequisite added".into(),
            prerequisite: Some(prerequisite),
        }
    }

    #[must_use]
    pub fn denied(reason: DenyReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
            message: reason.message().into(),
            prerequisite: None,
        }
    }
}

/// `GET /api/registration-status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RegistrationStatus {
    pub registration_open: bool,
}

/// `GET /api/max-courses-limit`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MaxCoursesLimit {
    pub max_courses_limit: u32,
}

/// A student's active enrollment count next to the global limit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EnrollmentCount {
    pub enrollment_count: u32,
    pub max_courses_limit: u32,
}

/// Student row joined with its department name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudentInfo {
    #[serde(flatten)]
    pub student: Student,
    pub department_name: String,
}

/// Compact course reference used inside other responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CourseRef {
    pub id: CourseId,
    pub course_code: String,
    pub name: String,
}

/// One entry of the available-courses view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AvailableCourse {
    #[serde(flatten)]
    pub course: Course,
    pub enrolled_count: u32,
    pub prerequisite_courses: Vec<CourseRef>,
    #[serde(flatten)]
    pub availability: Availability,
}

/// Courses in the student's department with per-course availability flags.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AvailableCourses {
    pub student_id: StudentId,
    pub registration_open: bool,
    pub enrollment_count: u32,
    pub max_courses_limit: u32,
    pub courses: Vec<AvailableCourse>,
}

/// A completed course as listed for a student.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompletedCourseView {
    pub course_id: CourseId,
    pub course_code: String,
    pub name: String,
    pub completed_at: DateTime<Utc>,
}

/// An active enrollment as listed for a student.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EnrolledCourseView {
    pub course_id: CourseId,
    pub course_code: String,
    pub name: String,
    pub enrolled_at: DateTime<Utc>,
}

/// A student's full course history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StudentCourses {
    pub student: Student,
    pub completed: Vec<CompletedCourseView>,
    pub enrolled: Vec<EnrolledCourseView>,
}

/// A prerequisite edge resolved to the required course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PrerequisiteDetail {
    /// Edge id, used to remove the edge.
    pub id: PrerequisiteId,
    pub prerequisite_id: CourseId,
    pub course_code: String,
    pub name: String,
}

/// A course with its direct prerequisites.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CoursePrerequisites {
    pub course: Course,
    pub prerequisites: Vec<PrerequisiteDetail>,
}

/// A student currently enrolled in a course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: StudentId,
    pub student_id: String,
    pub name: String,
    pub registration_number: String,
    pub enrolled_at: DateTime<Utc>,
}

/// A course with its enrolled students.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CourseRoster {
    pub course: Course,
    pub students: Vec<RosterEntry>,
}

/// Enrollment statistics for one course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CourseStatistics {
    pub course_id: CourseId,
    pub course_code: String,
    pub name: String,
    pub department_name: String,
    pub max_students: u32,
    pub enrolled_count: u32,
    pub completed_count: u32,
    /// `enrolled_count / max_students * 100`, rounded to 2 decimals.
    pub enrollment_percentage: f64,
}

/// Percentage of seats taken, rounded to 2 decimals. Zero capacity yields 0.
#[must_use]
pub fn enrollment_percentage(enrolled_count: u32, max_students: u32) -> f64 {
    if max_students == 0 {
        return 0.0;
    }
    let raw = f64::from(enrolled_count) / f64::from(max_students) * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Result of a bulk enrollment reset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResetOutcome {
    pub removed: u64,
    pub registration_number: Option<String>,
}

/// Result of a delete operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub id: i64,
    pub deleted: bool,
    /// Dependent rows removed along with the entity (prerequisite edges for
    /// courses, ledger rows for force-deleted students).
    pub cascaded: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert!((enrollment_percentage(1, 3) - 33.33).abs() < f64::EPSILON);
        assert!((enrollment_percentage(2, 3) - 66.67).abs() < f64::EPSILON);
        assert!((enrollment_percentage(5, 5) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_of_zero_capacity_is_zero() {
        assert!(enrollment_percentage(3, 0).abs() < f64::EPSILON);
    }
}
