use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::config::{config, AppConfig};
use crate::database::DatabaseManager;
use crate::routes::app;
use crate::services::{EmailQueue, LogMailer};
use crate::state::AppState;

const EMAIL_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Database URL (overrides DATABASE_URL)")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(port) = self.port {
            config.api.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        config
    }
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = args.apply(config().clone());
    info!("Starting Stores API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open database")?;
    DatabaseManager::migrate(&pool)
        .await
        .context("failed to apply migrations")?;

    let (email, worker) = EmailQueue::start(
        Arc::new(LogMailer),
        config.email.sender.clone(),
        config.email.queue_capacity,
    );

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::new(pool.clone(), config, email)
        .context("invalid JWT configuration (JWT_SECRET_KEY must be set outside development)")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Stores API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the router closes the queue; give the worker a moment to drain it
    match tokio::time::timeout(EMAIL_DRAIN_TIMEOUT, worker).await {
        Ok(Err(e)) => warn!("Email worker ended abnormally: {}", e),
        Err(_) => warn!("Email worker still busy at shutdown"),
        Ok(Ok(())) => {}
    }
    DatabaseManager::close(pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
