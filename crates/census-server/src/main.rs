//! census server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `CENSUS_*` environment variables, opens the SQLite store and the upload
//! directory, and serves the registry API over HTTP until Ctrl-C.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use census_api::RecordService;
use census_photo::PhotoDir;
use census_server::{ServerConfig, expand_tilde};
use census_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Census person registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  let config = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let db_path = expand_tilde(&config.database_path);
  let store = Arc::new(
    SqliteStore::open(&db_path)
      .await
      .with_context(|| format!("failed to open store at {db_path:?}"))?,
  );

  let upload_dir = expand_tilde(&config.upload_dir);
  let photos = PhotoDir::open(&upload_dir)
    .await
    .with_context(|| format!("failed to prepare upload directory {upload_dir:?}"))?;

  let service = Arc::new(RecordService::new(store.clone(), photos));
  let app = census_server::app(service, &config)?;
  let address = format!("{}:{}", config.host, config.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  // The router, and with it the service, is gone once `serve` returns.
  match Arc::try_unwrap(store) {
    Ok(store) => store.close().await.context("failed to close store")?,
    Err(_) => tracing::warn!("store still referenced at shutdown; not closed"),
  }
  tracing::info!("Shut down cleanly");

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "could not listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  tracing::info!("Shutting down gracefully");
}
