mod bootstrap;
mod customers;
mod health;
mod router;
mod service;

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::{Context, Result};
use grocery_core::config::{AppConfig, LoadOptions};
use tokio::{net::TcpListener, sync::oneshot};

fn init_logging(config: &AppConfig) {
    use grocery_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Logging must be up before bootstrap emits its first event.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap(config).await?;
    let address = app.config.server.listen_address();
    let drain_window = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind customer API listener on {address}"))?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(
        axum::serve(listener, app.router())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .into_future(),
    );

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        listen_address = %address,
        storage_path = %app.config.storage.path.display(),
        "grocery-server listening"
    );

    wait_for_shutdown().await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        drain_window_secs = drain_window.as_secs(),
        "grocery-server stopping"
    );
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(drain_window, server).await {
        Ok(joined) => joined.context("server task failed")?.context("server error")?,
        Err(_) => tracing::warn!(
            event_name = "system.server.drain_timeout",
            correlation_id = "shutdown",
            "in-flight requests did not finish within the drain window"
        ),
    }

    tracing::info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "grocery-server stopped"
    );

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
