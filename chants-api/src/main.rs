//! chants-api - Chant suggestion service
//!
//! Serves the results panel and the `/api/getChants` endpoint over a SQLite
//! song store. A missing database is created empty on first start.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chants_common::config::{CliOverrides, ServiceConfig};
use chants_common::db::init_database;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chants_api::api::buildinfo::BuildInfo;
use chants_api::{build_router, AppState};

/// Command-line arguments for chants-api
///
/// Each flag also has a CHANTS_* environment variable; see
/// `chants_common::config` for the full resolution order.
#[derive(Parser, Debug)]
#[command(name = "chants-api")]
#[command(about = "Liturgical chant suggestion service")]
#[command(version)]
struct Args {
    /// Path to config.toml
    #[arg(short, long, env = "CHANTS_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database holding the chants table
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log filter (e.g. "info", "chants_api=debug")
    #[arg(long)]
    log_level: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_file: args.config,
            database_path: args.database,
            bind_address: args.bind,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Resolve first: the log level may come from the config file
    let resolved = ServiceConfig::resolve(args.into());

    let log_level = resolved
        .as_ref()
        .map(|r| r.config.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(&log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting chants-api {}", BuildInfo::current());

    let resolved = resolved.context("Failed to resolve configuration")?;
    resolved.source.log();

    let config = resolved.config;
    info!("Database path: {}", config.database_path.display());
    info!("Log level: {}", config.log_level);

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open chants database")?;

    let app = build_router(AppState::new(pool.clone()));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("chants-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Default filter: the configured level for our crates and tower_http
fn default_filter(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("chants_api={0},chants_common={0},tower_http={0}", level)
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
