//! weft server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite contact store, and serves the JSON API over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use axum::{Router, http::StatusCode};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use weft_store_sqlite::SqliteStore;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Weft contact identity server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create the store and its schema, then exit without serving.
  #[arg(long)]
  init_only: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.init_only {
    tracing::info!(path = ?store_path, "store initialised");
    return Ok(());
  }

  let app = with_middleware(
    weft_api::api_router(Arc::new(store)),
    server_cfg.request_timeout(),
  );

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

/// Wraps the API in request tracing and a per-request deadline. Requests
/// that outlive the deadline are answered with `408 Request Timeout`.
fn with_middleware(router: Router, timeout: Duration) -> Router {
  router
    .layer(TimeoutLayer::with_status_code(
      StatusCode::REQUEST_TIMEOUT,
      timeout,
    ))
    .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request, routing::get};
  use tower::ServiceExt as _;

  use super::*;

  #[tokio::test]
  async fn slow_requests_time_out_with_408() {
    let router = Router::new()
      .route(
        "/slow",
        get(|| async {
          tokio::time::sleep(Duration::from_secs(5)).await;
          "done"
        }),
      )
      .route("/fast", get(|| async { "done" }));
    let app = with_middleware(router, Duration::from_millis(50));

    let req = Request::builder().uri("/slow").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);

    let req = Request::builder().uri("/fast").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
