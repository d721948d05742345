use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CourseCommands, DepartmentCommands, PolicyCommands, PrereqCommands, ResetCommands,
    StudentCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Departments.
    Department {
        #[command(subcommand)]
        action: DepartmentCommands,
    },
    /// Courses.
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },
    /// Prerequisite edges.
    Prereq {
        #[command(subcommand)]
        action: PrereqCommands,
    },
    /// Students.
    Student {
        #[command(subcommand)]
        action: StudentCommands,
    },
    /// Record a completed course (promotes an active enrollment).
    Complete(LedgerArgs),
    /// Enroll a student in a course.
    Enroll(LedgerArgs),
    /// Drop a student's enrollment.
    Unenroll(LedgerArgs),
    /// Registration status and max-courses limit.
    Policy {
        #[command(subcommand)]
        action: PolicyCommands,
    },
    /// Remove active enrollments.
    Reset {
        #[command(subcommand)]
        action: ResetCommands,
    },
    /// Per-course enrollment statistics.
    Stats,
}

/// `<student> <course>` pair for ledger commands.
#[derive(Clone, Debug, Args)]
pub struct LedgerArgs {
    /// Student id.
    pub student: i64,
    /// Course id.
    pub course: i64,
}
