use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, PrerequisiteId};

/// A stored prerequisite edge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Prerequisite {
    pub id: PrerequisiteId,
    pub course_id: CourseId,
    pub prerequisite_id: CourseId,
    pub created_at: DateTime<Utc>,
}

impl Prerequisite {
    #[must_use]
    pub const fn edge(&self) -> PrerequisiteEdge {
        PrerequisiteEdge {
            course_id: self.course_id,
            prerequisite_id: self.prerequisite_id,
        }
    }
}

/// Directed edge `course_id -> prerequisite_id`: `prerequisite_id` must be
/// completed before enrolling in `course_id`.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct PrerequisiteEdge {
    pub course_id: CourseId,
    pub prerequisite_id: CourseId,
}

impl PrerequisiteEdge {
    #[must_use]
    pub const fn new(course_id: CourseId, prerequisite_id: CourseId) -> Self {
        Self {
            course_id,
            prerequisite_id,
        }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            course_id: self.prerequisite_id,
            prerequisite_id: self.course_id,
        }
    }
}
