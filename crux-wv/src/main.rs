//! crux-wv (Wall Viewer) - Main entry point
//!
//! Loads the records table and the problem coordinate table, then serves the
//! wall surface on which attempts are drawn as curves over the holds.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crux_common::config::{CliOverrides, TomlConfig, ViewerSettings};
use crux_common::loader::load_datasets;
use crux_wv::{build_router, log_directives, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for crux-wv
#[derive(Parser, Debug)]
#[command(name = "crux-wv")]
#[command(about = "Wall viewer for climbing attempt trajectories")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "CRUX_WV_PORT")]
    port: Option<u16>,

    /// Folder containing record.json and probleminfo.json
    #[arg(short, long)]
    data_folder: Option<PathBuf>,

    /// Records table (relative to the data folder, or absolute)
    #[arg(long)]
    records: Option<PathBuf>,

    /// Problem coordinate table (relative to the data folder, or absolute)
    #[arg(long)]
    problems: Option<PathBuf>,

    /// Declared surface extent as "x y w h"
    #[arg(long)]
    view_box: Option<String>,

    /// Config file (default: ~/.config/crux/config.toml, then /etc/crux/config.toml)
    #[arg(short, long, env = "CRUX_CONFIG")]
    config: Option<PathBuf>,

    /// Log level for the crux crates when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            data_folder: self.data_folder.clone(),
            records_file: self.records.clone(),
            problems_file: self.problems.clone(),
            view_box: self.view_box.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // The config file may set the log level, so read it before tracing starts
    // and report the outcome afterwards
    let config_path = TomlConfig::locate(args.config.as_deref());
    let (config, config_error) = match &config_path {
        Some(path) => match TomlConfig::load(path) {
            Ok(config) => (config, None),
            Err(e) => (TomlConfig::default(), Some(e)),
        },
        None => (TomlConfig::default(), None),
    };
    let settings = ViewerSettings::resolve(&args.overrides(), &config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_directives(settings.log_level.as_deref()).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting Crux Wall Viewer (crux-wv) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match (&config_path, config_error) {
        (Some(path), None) => info!("Loaded config from {}", path.display()),
        (Some(path), Some(e)) => warn!("Ignoring config file {}: {}", path.display(), e),
        (None, _) => info!("No config file found, using defaults"),
    }
    info!("Data folder: {}", settings.data_folder.display());

    let datasets = match load_datasets(&settings.datasets).await {
        Ok(datasets) => datasets,
        Err(e) => {
            error!("Failed to load datasets: {}", e);
            return Err(e).context("Nothing to draw without both tables");
        }
    };

    let state = AppState::new(datasets.into_index(), &settings.view_box);
    info!(
        "Wall extent: {} ({} problems, {} records)",
        state.view_box,
        state.index.problem_ids().len(),
        state.index.records().len()
    );
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], settings.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("crux-wv listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
