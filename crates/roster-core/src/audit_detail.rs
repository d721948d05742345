//! Typed audit detail payloads.
//!
//! Each audit entry can carry a structured `detail` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, StudentId};

/// Detail for `AuditAction::Enrolled` and `AuditAction::Unenrolled`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EnrollmentDetail {
    pub student_id: StudentId,
    pub course_id: CourseId,
}

/// Detail for `AuditAction::Completed`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompletedDetail {
    pub student_id: StudentId,
    pub course_id: CourseId,
    /// Whether an active enrollment was removed by the completion.
    pub promoted: bool,
}

/// Detail for `AuditAction::PolicyChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PolicyChangedDetail {
    pub setting: String,
    pub from: String,
    pub to: String,
}

/// Detail for `AuditAction::Reset`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResetDetail {
    pub removed: u64,
    pub registration_number: Option<String>,
}
