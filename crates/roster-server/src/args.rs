//! Server command line arguments.

use std::path::PathBuf;

use clap::Parser;
use roster_config::RosterConfig;

/// Roster HTTP/JSON API server.
///
/// Settings come from the layered configuration (`ROSTER_*` environment
/// variables and `config.toml` files); flags given here win.
#[derive(Debug, Parser)]
#[command(name = "roster-server")]
#[command(about = "HTTP/JSON API for Roster course registration")]
pub struct Args {
    /// Address to listen on, e.g. `0.0.0.0:8080`.
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Path to the database file, or `:memory:`.
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Reject prerequisite edges that close a cycle of any length.
    #[arg(long)]
    pub strict_cycles: bool,
}

impl Args {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut RosterConfig) {
        if let Some(listen) = &self.listen {
            config.server.listen_addr.clone_from(listen);
        }
        if let Some(database) = &self.database {
            config.database.path.clone_from(database);
        }
        if self.strict_cycles {
            config.catalog.strict_cycle_check = true;
        }
    }
}
