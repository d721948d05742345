//! Roster HTTP/JSON API binary.

use anyhow::Context;
use clap::Parser;
use roster_config::RosterConfig;
use roster_db::service::RosterService;
use roster_server::{AppState, Args, create_router};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("ROSTER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    let args = Args::parse();
    let mut config = RosterConfig::load_with_dotenv().context("failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    info!(
        listen = %config.server.listen_addr,
        database = %config.database.path.display(),
        strict_cycle_check = config.catalog.strict_cycle_check,
        "Starting Roster server"
    );

    let service = RosterService::from_config(&config)
        .await
        .context("failed to open database")?;
    let policy = service.get_policy().await?;
    info!(
        registration_open = policy.registration_open,
        max_courses_limit = policy.max_courses_limit,
        "Policy loaded"
    );

    let app = create_router(AppState::new(service, config.server.cors_permissive));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;
    info!("Roster listening on {}", config.server.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Roster server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
