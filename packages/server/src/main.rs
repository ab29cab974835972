use std::net::SocketAddr;

use anyhow::Context;
use tracing::{Level, info};

use site_server::assets::build_object_store;
use site_server::config::AppConfig;
use site_server::state::AppState;
use site_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    let level: Level = config.log.level.parse().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    seed::seed_role_permissions(&db)
        .await
        .context("Failed to seed roles")?;
    seed::seed_site_config(&db)
        .await
        .context("Failed to seed site configuration")?;

    let store = build_object_store(&config.storage)
        .await
        .context("Failed to initialize object store")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let app = build_router(AppState::new(db, config, store));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
