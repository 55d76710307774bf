//! # Kasir API
//!
//! HTTP server for the Kasir POS backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir API Server                                 │
//! │                                                                         │
//! │  Client ───► HTTP (8080) ───► routes ───► kasir-db ───► SQLite (WAL)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```bash
//! kasir-api                        # defaults, or the platform kasir.toml
//! kasir-api --config ./kasir.toml
//! KASIR_PORT=9000 KASIR_UTC_OFFSET=+07:00 kasir-api
//! ```

use std::path::PathBuf;

use anyhow::Context;
use kasir_api::{router, AppState, ServerConfig};
use kasir_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,kasir=debug,sqlx=warn";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Kasir API server...");

    let args = parse_args(std::env::args().skip(1)).map_err(anyhow::Error::msg)?;
    if args.help {
        print_help();
        return Ok(());
    }

    let config = ServerConfig::load(args.config_path).context("Failed to load configuration")?;
    let addr = config.socket_addr()?;
    let offset = config.utc_offset()?;
    info!(
        %addr,
        db_path = %config.database.path.display(),
        report_offset = %offset,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database.path)
            .max_connections(config.database.max_connections)
            .report_offset(offset),
    )
    .await
    .context("Failed to open database")?;
    info!("Database ready");

    let app = router(AppState::new(db.clone()));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening for HTTP requests");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    db.close().await;

    if let Err(e) = served {
        warn!(error = %e, "Server stopped with an error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` wins over the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Command line flags.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    config_path: Option<PathBuf>,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut cli = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => match args.next() {
                Some(path) => cli.config_path = Some(PathBuf::from(path)),
                None => return Err("--config requires a path".to_string()),
            },
            "--help" | "-h" => cli.help = true,
            other => {
                warn!(argument = %other, "Ignoring unknown argument");
            }
        }
    }

    Ok(cli)
}

fn print_help() {
    println!("Kasir POS API server");
    println!();
    println!("Usage: kasir-api [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  TOML config file (default: $KASIR_CONFIG or platform config dir)");
    println!("  -h, --help           Show this help message");
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
