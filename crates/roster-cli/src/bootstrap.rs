use anyhow::Context;
use roster_config::RosterConfig;

use crate::cli::GlobalFlags;

/// Layered configuration with `.env`, then the `--database` override.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<RosterConfig> {
    let mut config = RosterConfig::load_with_dotenv().context("failed to load configuration")?;
    apply_overrides(&mut config, flags);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn apply_overrides(config: &mut RosterConfig, flags: &GlobalFlags) {
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
    }
}
