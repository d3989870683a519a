//! HTTP server assembly for Census.
//!
//! Wraps the [`census_api`] router with everything the binary owns:
//! configuration, CORS, request tracing, the upload body limit, and static
//! serving of processed photos under `/uploads/`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{
  Router,
  extract::DefaultBodyLimit,
  http::{HeaderValue, header},
};
use census_api::RecordService;
use census_core::store::RecordStore;
use serde::Deserialize;
use tower_http::{
  cors::{AllowHeaders, AllowMethods, CorsLayer},
  services::ServeDir,
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `CENSUS_*` environment variables. Every key has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub database_path:    PathBuf,
  pub upload_dir:       PathBuf,
  /// The single browser origin allowed to call the API with credentials.
  pub cors_origin:      String,
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             5000,
      database_path:    PathBuf::from("census.db"),
      upload_dir:       PathBuf::from("uploads"),
      cors_origin:      "http://localhost:3000".to_string(),
      max_upload_bytes: 10 * 1024 * 1024,
    }
  }
}

impl ServerConfig {
  /// Layer an optional TOML file under `CENSUS_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CENSUS"))
      .build()?
      .try_deserialize()
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// CORS for the configured browser origin, with credentials. Methods and
/// headers mirror the preflight request, since wildcards are not allowed
/// alongside credentials.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
  let origin = HeaderValue::from_str(origin)
    .with_context(|| format!("invalid CORS origin {origin:?}"))?;
  Ok(
    CorsLayer::new()
      .allow_origin(origin)
      .allow_credentials(true)
      .allow_methods(AllowMethods::mirror_request())
      .allow_headers(AllowHeaders::mirror_request())
      .expose_headers([header::CONTENT_TYPE]),
  )
}

/// Build the complete application: `/api/users/...` plus `/uploads/...`.
pub fn app<S>(
  service: Arc<RecordService<S>>,
  config: &ServerConfig,
) -> anyhow::Result<Router>
where
  S: RecordStore + 'static,
{
  let uploads = ServeDir::new(service.photos().root());

  Ok(
    Router::new()
      .nest("/api", census_api::api_router(service))
      .nest_service("/uploads", uploads)
      .layer(DefaultBodyLimit::max(config.max_upload_bytes))
      .layer(cors_layer(&config.cors_origin)?)
      .layer(TraceLayer::new_for_http()),
  )
}
