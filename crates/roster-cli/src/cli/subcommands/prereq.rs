use clap::Subcommand;

/// Prerequisite edge commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PrereqCommands {
    /// Require `prerequisite` before `course`.
    Add { course: i64, prerequisite: i64 },
    /// Remove an edge by its ID.
    Remove { id: i64 },
}
