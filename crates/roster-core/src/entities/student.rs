use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{DepartmentId, StudentId};

/// A registered student.
///
/// `id` is the row id used everywhere in the API; `student_id` and
/// `registration_number` are institutional identifiers, both unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub student_id: String,
    pub name: String,
    pub department_id: DepartmentId,
    pub registration_number: String,
    pub semester: String,
    pub created_at: DateTime<Utc>,
}
