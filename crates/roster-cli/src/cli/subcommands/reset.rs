use clap::Subcommand;

/// Enrollment reset commands. Completed courses are kept.
#[derive(Clone, Debug, Subcommand)]
pub enum ResetCommands {
    /// Remove every active enrollment.
    All,
    /// Remove one student's active enrollments.
    Student { registration_number: String },
}
