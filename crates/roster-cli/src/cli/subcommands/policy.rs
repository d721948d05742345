use clap::Subcommand;

/// Policy commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PolicyCommands {
    /// Show registration status and max-courses limit.
    Show,
    /// Open registration.
    Open,
    /// Close registration.
    Close,
    /// Set the max number of concurrent courses per student.
    Limit { max_courses: u32 },
}
