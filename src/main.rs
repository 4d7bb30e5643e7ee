use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use xp_i18n::{app, config::Config, i18n::Localization};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xp_i18n=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    // All language files must load before serving; any failure aborts startup
    let localization = Localization::initialize(config.i18n.clone())
        .with_context(|| format!("Failed to load languages from {}", config.i18n.path.display()))?;

    for report in localization.store().coverage() {
        if !report.extra.is_empty() {
            warn!(
                "Language '{}' defines {} keys unknown to the default language",
                report.lang,
                report.extra.len()
            );
        }
    }

    let router = app::create_router(Arc::new(localization))
        .context("Failed to mount i18n endpoints")?;

    if config.i18n.endpoint_enabled {
        info!(
            "i18n endpoints mounted at '{}'",
            config.i18n.normalized_endpoint_path()
        );
    }

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
