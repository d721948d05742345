pub mod course;
pub mod department;
pub mod policy;
pub mod prereq;
pub mod reset;
pub mod student;

pub use course::CourseCommands;
pub use department::DepartmentCommands;
pub use policy::PolicyCommands;
pub use prereq::PrereqCommands;
pub use reset::ResetCommands;
pub use student::StudentCommands;
