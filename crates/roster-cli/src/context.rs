use roster_config::RosterConfig;
use roster_db::service::RosterService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: RosterService,
    pub config: RosterConfig,
}

impl AppContext {
    pub async fn init(config: RosterConfig) -> anyhow::Result<Self> {
        tracing::debug!(path = %config.database.path.display(), "opening database");
        let service = RosterService::from_config(&config).await?;
        Ok(Self { service, config })
    }
}
