//! imgdrop server
//!
//! Main entry point for the image upload service.

mod cli;
mod shutdown;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgdrop_api::{AppState, create_router};
use imgdrop_core::storage::build_backend;
use imgdrop_shared::{AppConfig, BackendKind};

use crate::cli::Cli;
use crate::shutdown::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgdrop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration, then apply flags
    let cli = Cli::parse();
    let mut config = AppConfig::load().context("failed to load configuration")?;
    cli.apply(&mut config);

    info!(
        backend = config.storage.backend.as_str(),
        bucket = config.storage.s3.bucket.as_deref().unwrap_or(""),
        "Storage selected"
    );

    if config.storage.backend == BackendKind::Local && config.storage.local.base_dir.is_none() {
        config.storage.local.base_dir = Some(default_base_dir()?);
    }
    config.storage.validate()?;

    // Create storage backend
    let storage = build_backend(&config.storage).context("failed to initialize storage")?;
    info!(
        backend = storage.name(),
        base_path = ?storage.base_path(),
        "Storage backend initialized"
    );

    // Create router
    let app = create_router(AppState::new(storage));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `image` directory next to the running executable.
fn default_base_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate executable")?;
    let dir = exe
        .parent()
        .context("executable has no parent directory")?;
    Ok(dir.join("image"))
}
