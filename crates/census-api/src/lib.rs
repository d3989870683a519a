//! JSON/multipart REST API for Census.
//!
//! Exposes an axum [`Router`] backed by a [`RecordService`] over any
//! [`census_core::store::RecordStore`]. CORS, static files, body limits, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", census_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod form;
pub mod service;
pub mod users;

use std::sync::Arc;

use axum::{Router, routing::get};
use census_core::store::RecordStore;

pub use error::ApiError;
pub use service::RecordService;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<RecordService<S>>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/search", get(users::search::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .delete(users::delete_one::<S>),
    )
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::io::Cursor;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use census_photo::PhotoDir;
  use census_store_sqlite::SqliteStore;
  use image::{ImageFormat, RgbImage};
  use serde_json::Value;
  use tempfile::TempDir;
  use tower::ServiceExt as _;

  use super::*;

  const BOUNDARY: &str = "census-test-boundary";

  struct Harness {
    router: Router,
    photos: TempDir,
  }

  async fn harness() -> Harness {
    let photos = tempfile::tempdir().unwrap();
    let store = SqliteStore::open_in_memory().await.unwrap();
    let dir = PhotoDir::open(photos.path()).await.unwrap();
    let service = Arc::new(RecordService::new(Arc::new(store), dir));
    Harness {
      router: Router::new().nest("/api", api_router(service)),
      photos,
    }
  }

  fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbImage::new(width, height)
      .write_to(&mut out, ImageFormat::Png)
      .unwrap();
    out.into_inner()
  }

  fn fields(last_name: &str, passport_id: &str) -> Vec<(&'static str, String)> {
    vec![
      ("first_name", "John".into()),
      ("last_name", last_name.into()),
      ("middle_name", "Q".into()),
      ("birth_date", "1980-07-04".into()),
      ("nationality", "American".into()),
      ("citizenship", "USA".into()),
      ("address", "1 Main St".into()),
      ("passport_id", passport_id.into()),
    ]
  }

  fn multipart_body(fields: &[(&str, String)], photo: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
      );
    }
    if let Some(bytes) = photo {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; \
           filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
      );
      body.extend_from_slice(bytes);
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
  }

  async fn send(router: &Router, method: &str, uri: &str, body: Option<Vec<u8>>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(bytes) => {
        builder = builder.header(
          header::CONTENT_TYPE,
          format!("multipart/form-data; boundary={BOUNDARY}"),
        );
        Body::from(bytes)
      }
      None => Body::empty(),
    };
    router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  async fn create(h: &Harness, last: &str, passport_id: &str, photo: Option<&[u8]>) -> Value {
    let resp = send(
      &h.router,
      "POST",
      "/api/users",
      Some(multipart_body(&fields(last, passport_id), photo)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json(resp).await
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_with_photo_returns_201_and_record() {
    let h = harness().await;
    let photo = png(1000, 500);
    let body = create(&h, "Smith", "AB123456", Some(&photo)).await;

    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["last_name"], "Smith");
    assert_eq!(body["birth_date"], "1980-07-04");

    let filename = body["photo"].as_str().unwrap();
    let stored = image::open(h.photos.path().join(filename)).unwrap();
    assert_eq!((stored.width(), stored.height()), (667, 500));
  }

  #[tokio::test]
  async fn create_without_photo_has_null_photo() {
    let h = harness().await;
    let body = create(&h, "Smith", "AB123456", None).await;
    assert!(body["photo"].is_null());
  }

  #[tokio::test]
  async fn empty_photo_part_counts_as_absent() {
    let h = harness().await;
    let body = create(&h, "Smith", "AB123456", Some(&[])).await;
    assert!(body["photo"].is_null());
  }

  #[tokio::test]
  async fn duplicate_passport_returns_400() {
    let h = harness().await;
    let first = create(&h, "Smith", "AB123456", None).await;

    let resp = send(
      &h.router,
      "POST",
      "/api/users",
      Some(multipart_body(&fields("Jones", "AB123456"), None)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail = json(resp).await["detail"].as_str().unwrap().to_owned();
    assert!(detail.contains("AB123456"), "detail: {detail}");

    let id = first["id"].as_i64().unwrap();
    let resp = send(&h.router, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(json(resp).await, first);
  }

  #[tokio::test]
  async fn missing_field_returns_400() {
    let h = harness().await;
    let mut f = fields("Smith", "AB123456");
    f.retain(|(name, _)| *name != "address");

    let resp = send(&h.router, "POST", "/api/users", Some(multipart_body(&f, None))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let detail = json(resp).await["detail"].as_str().unwrap().to_owned();
    assert!(detail.contains("address"), "detail: {detail}");
  }

  #[tokio::test]
  async fn bad_birth_date_returns_400() {
    let h = harness().await;
    let mut f = fields("Smith", "AB123456");
    f[3].1 = "04/07/1980".into();
    let resp = send(&h.router, "POST", "/api/users", Some(multipart_body(&f, None))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn undecodable_photo_returns_400() {
    let h = harness().await;
    let resp = send(
      &h.router,
      "POST",
      "/api/users",
      Some(multipart_body(&fields("Smith", "AB123456"), Some(b"GIF89a-junk"))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(h.photos.path()).unwrap().count(), 0);
  }

  // ── Read ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_returns_all_records() {
    let h = harness().await;
    create(&h, "Smith", "P1", None).await;
    create(&h, "Jones", "P2", None).await;

    let resp = send(&h.router, "GET", "/api/users", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp).await.as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn get_unknown_returns_404() {
    let h = harness().await;
    let resp = send(&h.router, "GET", "/api/users/12345", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(json(resp).await["detail"].is_string());
  }

  // ── Search ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_without_query_returns_400() {
    let h = harness().await;
    let resp = send(&h.router, "GET", "/api/users/search", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&h.router, "GET", "/api/users/search?query=", None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn search_matches_case_insensitively() {
    let h = harness().await;
    create(&h, "Smith", "P1", None).await;
    create(&h, "Jones", "P2", None).await;

    let resp = send(&h.router, "GET", "/api/users/search?query=smi", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let hits = json(resp).await;
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["last_name"], "Smith");
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_unknown_returns_404_and_creates_nothing() {
    let h = harness().await;
    let resp = send(
      &h.router,
      "PUT",
      "/api/users/77",
      Some(multipart_body(&fields("Smith", "P1"), None)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&h.router, "GET", "/api/users", None).await;
    assert!(json(resp).await.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn update_replaces_fields_and_photo() {
    let h = harness().await;
    let first_photo = png(1000, 500);
    let created = create(&h, "Smith", "P1", Some(&first_photo)).await;
    let id = created["id"].as_i64().unwrap();

    let second_photo = png(300, 400);
    let resp = send(
      &h.router,
      "PUT",
      &format!("/api/users/{id}"),
      Some(multipart_body(&fields("Smythe", "P1"), Some(&second_photo))),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json(resp).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["last_name"], "Smythe");
    assert_ne!(updated["photo"], created["photo"]);

    let filename = updated["photo"].as_str().unwrap();
    let stored = image::open(h.photos.path().join(filename)).unwrap();
    assert_eq!((stored.width(), stored.height()), (300, 225));
  }

  #[tokio::test]
  async fn update_without_photo_keeps_existing() {
    let h = harness().await;
    let photo = png(40, 30);
    let created = create(&h, "Smith", "P1", Some(&photo)).await;
    let id = created["id"].as_i64().unwrap();

    let resp = send(
      &h.router,
      "PUT",
      &format!("/api/users/{id}"),
      Some(multipart_body(&fields("Smith", "P1-NEW"), None)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json(resp).await;
    assert_eq!(updated["passport_id"], "P1-NEW");
    assert_eq!(updated["photo"], created["photo"]);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_then_get_returns_404() {
    let h = harness().await;
    let photo = png(40, 30);
    let created = create(&h, "Smith", "P1", Some(&photo)).await;
    let id = created["id"].as_i64().unwrap();
    let filename = created["photo"].as_str().unwrap().to_owned();

    let resp = send(&h.router, "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(json(resp).await["message"].is_string());
    assert!(!h.photos.path().join(filename).exists());

    let resp = send(&h.router, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&h.router, "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
