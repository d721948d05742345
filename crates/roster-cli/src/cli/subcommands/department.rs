use clap::Subcommand;

/// Department commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DepartmentCommands {
    /// Create a department.
    Create {
        #[arg(long)]
        name: String,
    },
    /// List departments.
    List,
    /// Get a department by ID.
    Get { id: i64 },
    /// Rename a department.
    Rename {
        id: i64,
        #[arg(long)]
        name: String,
    },
    /// Delete a department with no courses or students.
    Delete { id: i64 },
}
