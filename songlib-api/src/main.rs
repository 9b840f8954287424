//! songlib-api - song catalog microservice
//!
//! Resolves configuration, opens the catalog database, and serves the HTTP
//! API until Ctrl+C or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use songlib_api::catalog::{CatalogService, SqliteCatalog};
use songlib_api::services::HttpEnricher;
use songlib_api::{build_router, AppState};
use songlib_common::config::{load_toml_config, ConfigOverrides, ServiceConfig, TomlConfig};
use songlib_common::db::init::{init_database, seed_groups};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for songlib-api
#[derive(Parser, Debug)]
#[command(name = "songlib-api")]
#[command(about = "Song catalog microservice")]
#[command(version)]
struct Args {
    /// Optional TOML config file
    #[arg(short, long, env = "SONGLIB_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long, env = "SONGLIB_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "SONGLIB_DATABASE")]
    database: Option<PathBuf>,

    /// Base URL of the metadata service
    #[arg(long, env = "EXTERNAL_API_URL")]
    enricher_url: Option<String>,

    /// Deadline for each metadata lookup, in milliseconds
    #[arg(long, env = "SONGLIB_ENRICHER_TIMEOUT_MS")]
    enricher_timeout_ms: Option<u64>,

    /// Deadline for each database call, in milliseconds
    #[arg(long, env = "SONGLIB_REPOSITORY_TIMEOUT_MS")]
    repository_timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "debug")
    #[arg(long, env = "SONGLIB_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database_path: self.database.clone(),
            enricher_url: self.enricher_url.clone(),
            enricher_timeout_ms: self.enricher_timeout_ms,
            repository_timeout_ms: self.repository_timeout_ms,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml = match &args.config {
        Some(path) => load_toml_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TomlConfig::default(),
    };

    let config = ServiceConfig::resolve(args.overrides(), toml)
        .context("Invalid configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting songlib-api v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = args.config.as_ref().filter(|p| !p.exists()) {
        // Reported again here: the loader ran before logging was set up
        warn!("Config file not found: {} (using defaults)", path.display());
    }
    info!("Database: {}", config.database_path.display());
    info!("Metadata service: {}", config.enricher_url);

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open database")?;
    seed_groups(&pool, &config.seed_groups)
        .await
        .context("Failed to seed groups")?;

    let enricher = HttpEnricher::new(config.enricher_url.clone(), config.deadlines.enricher)
        .context("Failed to build metadata client")?;

    let catalog = CatalogService::new(
        Arc::new(SqliteCatalog::new(pool)),
        Arc::new(enricher),
        config.deadlines,
    );
    let app = build_router(AppState::new(catalog));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!("Listening on http://{}", bind_addr);
    info!("Health check: http://{}/health", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
