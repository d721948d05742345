use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, DepartmentId};

/// A course offered by a department.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub course_code: String,
    pub name: String,
    pub department_id: DepartmentId,
    /// Ceiling on concurrent active enrollments. Always at least 1.
    pub max_students: u32,
    pub semester: Option<String>,
    pub created_at: DateTime<Utc>,
}
