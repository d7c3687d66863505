use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pollution_watch::api::{build_router, AppState};
use pollution_watch::config::AppConfig;
use pollution_watch::notify::{NotificationRouter, TelegramNotifier};
use pollution_watch::storage::ImageStore;
use pollution_watch::vision::VisionClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load();
    config.validate().context("invalid configuration")?;

    let store = Arc::new(ImageStore::new(config.storage.upload_dir.clone()));
    store
        .ensure_dir()
        .await
        .context("failed to prepare upload directory")?;

    let vision = Arc::new(
        VisionClient::new(config.vision.clone()).context("failed to build vision client")?,
    );
    let notifier = TelegramNotifier::new(config.telegram.clone())
        .context("failed to build telegram notifier")?;
    let notifications = Arc::new(NotificationRouter::new(notifier, config.telegram.simulate));

    let state = AppState {
        store,
        vision,
        notifications,
    };
    let app = build_router(state, config.server.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;

    info!(
        addr = %config.server.bind_addr,
        simulate = config.telegram.simulate,
        "pollution-watch listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}
