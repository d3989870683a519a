//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `census-store-sqlite`).
//! The record service depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use crate::person::{NewPerson, Person};

/// Backend errors must say whether they are a `passport_id` uniqueness
/// violation, so that the losing side of a concurrent create is reported
/// precisely instead of as a generic storage failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The conflicting passport ID if this error is a uniqueness violation.
  fn duplicate_passport(&self) -> Option<&str>;
}

/// Abstraction over a person record backend.
///
/// The backend's uniqueness constraint on `passport_id` is the sole arbiter
/// of duplicates; implementations must not check-then-insert.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new record and return it with its assigned id.
  fn insert(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All records, ordered by id.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Records whose first name, last name, or nationality contains `text`
  /// case-insensitively, ordered by id. `text` is matched literally.
  fn search<'a>(
    &'a self,
    text: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;

  /// Replace every field of record `id`. The photo reference is replaced
  /// only when `input.photo` is `Some`; `None` keeps whatever the row holds
  /// at write time. Returns `None` if the record does not exist.
  fn update(
    &self,
    id: i64,
    input: NewPerson,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Remove record `id` and return what was removed, or `None` if absent.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;
}
