//! Denial reasons, ledger statuses, entity types, and audit actions.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage and wire output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// DenyReason
// ---------------------------------------------------------------------------

/// Why an enroll, unenroll, or prerequisite-edge request was denied.
///
/// These are expected, user-facing outcomes, not errors. Storage failures are
/// reported separately through the storage layer's error type and are never
/// turned into a `DenyReason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    RegistrationClosed,
    AlreadyCompleted,
    AlreadyEnrolled,
    PrerequisitesNotMet,
    CourseFull,
    MaxCoursesReached,
    NotEnrolled,
    /// Catalog edit: the reverse edge exists, or the edge points at itself.
    DirectCycle,
    /// Catalog edit: the exact edge already exists.
    DuplicatePrerequisite,
    /// Catalog edit, strict mode only: the edge would close a longer cycle.
    TransitiveCycle,
}

impl DenyReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegistrationClosed => "registration_closed",
            Self::AlreadyCompleted => "already_completed",
            Self::AlreadyEnrolled => "already_enrolled",
            Self::PrerequisitesNotMet => "prerequisites_not_met",
            Self::CourseFull => "course_full",
            Self::MaxCoursesReached => "max_courses_reached",
            Self::NotEnrolled => "not_enrolled",
            Self::DirectCycle => "direct_cycle",
            Self::DuplicatePrerequisite => "duplicate_prerequisite",
            Self::TransitiveCycle => "transitive_cycle",
        }
    }

    /// Human-readable explanation suitable for an API `message` field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::RegistrationClosed => "Registration is currently closed",
            Self::AlreadyCompleted => "Course already completed",
            Self::AlreadyEnrolled => "Already enrolled in this course",
            Self::PrerequisitesNotMet => "Not all prerequisites are completed",
            Self::CourseFull => "Course is full",
            Self::MaxCoursesReached => "Maximum number of concurrent courses reached",
            Self::NotEnrolled => "Not enrolled in this course",
            Self::DirectCycle => "Courses cannot require each other",
            Self::DuplicatePrerequisite => "Prerequisite already exists",
            Self::TransitiveCycle => "Prerequisite would create a circular requirement chain",
        }
    }

    /// Whether this reason can only come from a catalog edit.
    #[must_use]
    pub const fn is_catalog_edit(self) -> bool {
        matches!(
            self,
            Self::DirectCycle | Self::DuplicatePrerequisite | Self::TransitiveCycle
        )
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EnrollmentStatus
// ---------------------------------------------------------------------------

/// Status column of an enrollment row.
///
/// Only `enrolled` rows exist in the ledger: unenrolling deletes the row and
/// completion moves the course into `completed_courses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Enrolled,
}

impl EnrollmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    Enrolled,
    Unenrolled,
    Completed,
    PolicyChanged,
    Reset,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Enrolled => "enrolled",
            Self::Unenrolled => "unenrolled",
            Self::Completed => "completed",
            Self::PolicyChanged => "policy_changed",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Department,
    Course,
    Prerequisite,
    Student,
    Enrollment,
    CompletedCourse,
    Policy,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Course => "course",
            Self::Prerequisite => "prerequisite",
            Self::Student => "student",
            Self::Enrollment => "enrollment",
            Self::CompletedCourse => "completed_course",
            Self::Policy => "policy",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
