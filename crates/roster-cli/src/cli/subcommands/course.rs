use clap::Subcommand;

/// Course commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CourseCommands {
    /// Create a course.
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        department: i64,
        #[arg(long)]
        max_students: u32,
        #[arg(long)]
        semester: Option<String>,
    },
    /// List courses.
    List {
        #[arg(long)]
        department: Option<i64>,
    },
    /// Get a course by ID.
    Get { id: i64 },
    /// Update a course.
    Update {
        id: i64,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        department: Option<i64>,
        #[arg(long)]
        max_students: Option<u32>,
        #[arg(long, conflicts_with = "clear_semester")]
        semester: Option<String>,
        /// Remove the semester.
        #[arg(long)]
        clear_semester: bool,
    },
    /// Delete a course with no enrollments or completions.
    Delete { id: i64 },
    /// Show a course's direct prerequisites.
    Prerequisites { id: i64 },
    /// List students enrolled in a course.
    Students { id: i64 },
}
