//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | All records |
//! | `POST`   | `/users` | Multipart [`PersonForm`]; returns 201 + stored record |
//! | `GET`    | `/users/search` | `?query=` required and non-empty |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PUT`    | `/users/{id}` | Multipart [`PersonForm`]; photo optional |
//! | `DELETE` | `/users/{id}` | Removes the record and its photo |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Multipart, Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use census_core::{person::Person, store::RecordStore};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, form::PersonForm, service::RecordService};

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub query: Option<String>,
}

/// `GET /users/search?query=<text>`
pub async fn search<S: RecordStore>(
  State(service): State<Arc<RecordService<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let query = params.query.unwrap_or_default();
  Ok(Json(service.search(&query).await?))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S: RecordStore>(
  State(service): State<Arc<RecordService<S>>>,
) -> Result<Json<Vec<Person>>, ApiError> {
  Ok(Json(service.list().await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S: RecordStore>(
  State(service): State<Arc<RecordService<S>>>,
  Path(id): Path<i64>,
) -> Result<Json<Person>, ApiError> {
  Ok(Json(service.get(id).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users` — returns 201 + the stored [`Person`].
pub async fn create<S: RecordStore>(
  State(service): State<Arc<RecordService<S>>>,
  multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
  let form = PersonForm::read(multipart).await?;
  let person = service.create(form.details, form.photo).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /users/{id}`
pub async fn update<S: RecordStore>(
  State(service): State<Arc<RecordService<S>>>,
  Path(id): Path<i64>,
  multipart: Multipart,
) -> Result<Json<Person>, ApiError> {
  let form = PersonForm::read(multipart).await?;
  Ok(Json(service.update(id, form.details, form.photo).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}` — body: `{"message": "..."}`.
pub async fn delete_one<S: RecordStore>(
  State(service): State<Arc<RecordService<S>>>,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
  service.delete(id).await?;
  Ok(Json(json!({ "message": format!("person {id} deleted") })))
}
