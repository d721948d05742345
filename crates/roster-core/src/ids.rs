//! Identifier aliases.
//!
//! Every table uses an `INTEGER PRIMARY KEY AUTOINCREMENT` rowid. The aliases
//! keep signatures readable where several ids travel together.

/// Row id of a department.
pub type DepartmentId = i64;

/// Row id of a course (not its `course_code`).
pub type CourseId = i64;

/// Row id of a student (not the institutional `student_id` string).
pub type StudentId = i64;

/// Row id of a prerequisite edge.
pub type PrerequisiteId = i64;

/// Default semester label assigned to students created without one.
pub const DEFAULT_SEMESTER: &str = "first";
