//! Course update builder.

use serde::{Deserialize, Serialize};

use super::deserialize_some;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
    #[serde(
        default,
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub semester: Option<Option<String>>,
}

pub struct CourseUpdateBuilder(CourseUpdate);

impl CourseUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CourseUpdate::default())
    }

    #[must_use]
    pub fn course_code(mut self, course_code: impl Into<String>) -> Self {
        self.0.course_code = Some(course_code.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn department_id(mut self, department_id: i64) -> Self {
        self.0.department_id = Some(department_id);
        self
    }

    #[must_use]
    pub const fn max_students(mut self, max_students: u32) -> Self {
        self.0.max_students = Some(max_students);
        self
    }

    #[must_use]
    pub fn semester(mut self, semester: Option<String>) -> Self {
        self.0.semester = Some(semester);
        self
    }

    #[must_use]
    pub fn build(self) -> CourseUpdate {
        self.0
    }
}

impl Default for CourseUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
