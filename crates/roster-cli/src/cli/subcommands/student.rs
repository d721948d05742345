use clap::Subcommand;

/// Student commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StudentCommands {
    /// Create a student.
    Create {
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        department: i64,
        #[arg(long)]
        registration_number: String,
        #[arg(long)]
        semester: Option<String>,
    },
    /// List students.
    List {
        #[arg(long)]
        department: Option<i64>,
    },
    /// Get a student with department name.
    Get { id: i64 },
    /// Update a student.
    Update {
        id: i64,
        #[arg(long)]
        student_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        department: Option<i64>,
        #[arg(long)]
        registration_number: Option<String>,
        #[arg(long)]
        semester: Option<String>,
    },
    /// Delete a student.
    Delete {
        id: i64,
        /// Also delete enrollments and completed courses.
        #[arg(long)]
        force: bool,
    },
    /// Completed and enrolled courses.
    Courses { id: i64 },
    /// Courses of the student's department with availability.
    Available { id: i64 },
}
