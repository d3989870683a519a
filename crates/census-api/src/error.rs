//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Domain(#[from] census_core::Error),

  #[error("malformed form: {0}")]
  Multipart(#[from] MultipartError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    use census_core::Error as E;

    let status = match &self {
      ApiError::Domain(E::NotFound(_)) => StatusCode::NOT_FOUND,
      ApiError::Domain(e) if !e.is_client_error() => {
        tracing::error!(error = %e, source = ?e, "request failed");
        return (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "detail": "internal server error" })),
        )
          .into_response();
      }
      ApiError::Domain(_) => StatusCode::BAD_REQUEST,
      // Keeps 413 for bodies over the configured limit.
      ApiError::Multipart(e) => e.status(),
    };
    (status, Json(json!({ "detail": self.to_string() }))).into_response()
  }
}
