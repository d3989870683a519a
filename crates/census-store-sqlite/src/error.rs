//! Error type for `census-store-sqlite`.

use census_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  /// The `UNIQUE (passport_id)` constraint rejected a write.
  #[error("passport ID {0} already exists")]
  DuplicatePassport(String),
}

impl StoreError for Error {
  fn duplicate_passport(&self) -> Option<&str> {
    match self {
      Error::DuplicatePassport(id) => Some(id),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
