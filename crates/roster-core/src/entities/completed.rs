use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, StudentId};

/// Admin-asserted fact that a student finished a course.
///
/// Terminal: once present it satisfies every prerequisite edge pointing at
/// `course_id` and blocks re-enrollment in that course.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CompletedCourse {
    pub id: i64,
    pub student_id: StudentId,
    pub course_id: CourseId,
    pub completed_at: DateTime<Utc>,
}
