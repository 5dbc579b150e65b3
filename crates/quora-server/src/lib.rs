//! HTTP server wiring for the Quora Mock API.
//!
//! Loads [`ServerConfig`], mounts [`quora_api::api_router`] next to the
//! liveness routes, and provides the shutdown signal used by the binary.

use std::{path::Path, path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use quora_core::store::ForumStore;
use quora_store_sqlite::DEFAULT_POOL_SIZE;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Read from an optional TOML file, overridden by `QUORA_*` environment
/// variables (e.g. `QUORA_PORT=8080`).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// Number of pooled SQLite connections.
  pub pool_size:  usize,
}

impl ServerConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 4000_i64)?
      .set_default("store_path", "quora.db")?
      .set_default("pool_size", DEFAULT_POOL_SIZE as i64)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("QUORA"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: liveness routes plus the forum API, with request
/// tracing. The health check answers on both `/health` and `/api/health`.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: ForumStore + 'static,
{
  Router::new()
    .route("/", get(banner))
    .route("/health", get(health))
    .route("/api/health", get(health))
    .merge(quora_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn banner() -> Json<&'static str> { Json("Quora Mock API is working") }

async fn health() -> Json<Value> {
  Json(json!({ "message": "Quora Mock API is working", "status": "healthy" }))
}

// ─── Shutdown ─────────────────────────────────────────────────────────────────

/// Resolve on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for Ctrl+C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut term) => {
        term.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => tracing::info!("Received Ctrl+C, starting shutdown"),
    _ = terminate => tracing::info!("Received SIGTERM, starting shutdown"),
  }
}
