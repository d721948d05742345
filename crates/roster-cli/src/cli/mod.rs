use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `rst` binary.
#[derive(Debug, Parser)]
#[command(name = "rst", version, about = "Roster - course registration administration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max rows for list commands
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides `database.path` from configuration)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            database: self.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{CourseCommands, PolicyCommands, ResetCommands, StudentCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "rst", "--format", "table", "--limit", "10", "--verbose", "stats",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["rst", "stats", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["rst", "--format", "xml", "stats"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn database_flag_is_copied() {
        let cli = Cli::try_parse_from(["rst", "--database", "/tmp/r.db", "policy", "show"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(
            flags.database.as_deref(),
            Some(std::path::Path::new("/tmp/r.db"))
        );
        assert!(matches!(
            cli.command,
            Commands::Policy {
                action: PolicyCommands::Show
            }
        ));
    }

    #[test]
    fn enroll_takes_student_and_course() {
        let cli = Cli::try_parse_from(["rst", "enroll", "3", "7"]).expect("cli should parse");
        match cli.command {
            Commands::Enroll(args) => {
                assert_eq!(args.student, 3);
                assert_eq!(args.course, 7);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn course_create_requires_capacity() {
        let parsed = Cli::try_parse_from([
            "rst", "course", "create", "--code", "CS101", "--name", "Intro", "--department", "1",
        ]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "rst", "course", "create", "--code", "CS101", "--name", "Intro", "--department", "1",
            "--max-students", "30",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Course {
                action: CourseCommands::Create { max_students: 30, .. }
            }
        ));
    }

    #[test]
    fn student_delete_force_flag() {
        let cli = Cli::try_parse_from(["rst", "student", "delete", "4", "--force"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Student {
                action: StudentCommands::Delete { id: 4, force: true }
            }
        ));
    }

    #[test]
    fn policy_limit_and_reset_student() {
        let cli = Cli::try_parse_from(["rst", "policy", "limit", "4"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Policy {
                action: PolicyCommands::Limit { max_courses: 4 }
            }
        ));

        let cli =
            Cli::try_parse_from(["rst", "reset", "student", "REG-1"]).expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Reset {
                action: ResetCommands::Student { .. }
            }
        ));
    }
}
