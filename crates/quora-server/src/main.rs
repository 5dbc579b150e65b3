//! quora-server binary.
//!
//! Reads `quora.toml` (or the path specified with `--config`), opens the
//! SQLite store, and serves the forum API over HTTP until Ctrl+C or SIGTERM.
//! In-flight requests finish before the connection pool is closed.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use quora_server::{ServerConfig, shutdown_signal};
use quora_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Quora Mock API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "quora.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = SqliteStore::open(&server_cfg.store_path, server_cfg.pool_size)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;
  let store = Arc::new(store);

  let app = quora_server::router(store.clone());
  let address = server_cfg.address();

  tracing::info!(pool_size = server_cfg.pool_size, "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await.context("failed to close store")?;
  tracing::info!("Server shutdown complete");

  Ok(())
}
