//! Error types for `census-core`.
//!
//! These variants are the taxonomy every layer reports in: the record
//! service produces them, and the HTTP layer maps each one to a status code.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("search query must not be empty")]
  EmptyQuery,

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("field {field} exceeds {max} characters")]
  FieldTooLong { field: &'static str, max: usize },

  #[error("invalid value for {field}: {reason}")]
  InvalidField { field: &'static str, reason: String },

  #[error("passport ID {0} already exists")]
  DuplicatePassport(String),

  #[error("person not found: {0}")]
  NotFound(i64),

  #[error("could not decode image: {0}")]
  ImageDecode(String),

  #[error("invalid image dimensions {width}x{height}")]
  InvalidDimensions { width: u32, height: u32 },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap any backend failure as [`Error::Storage`].
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }

  /// `true` for errors caused by the caller's input rather than the backend.
  pub fn is_client_error(&self) -> bool { !matches!(self, Self::Storage(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
