//! Entity structs for all Roster domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `roster-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod audit;
mod completed;
mod course;
mod department;
mod enrollment;
mod policy;
mod prerequisite;
mod student;

pub use audit::AuditEntry;
pub use completed::CompletedCourse;
pub use course::Course;
pub use department::Department;
pub use enrollment::Enrollment;
pub use policy::Policy;
pub use prerequisite::{Prerequisite, PrerequisiteEdge};
pub use student::Student;
