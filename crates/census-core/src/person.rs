//! Person records — the single entity the registry stores.
//!
//! A record is a set of required identity fields plus an optional reference
//! to a normalized photo on disk. No image data lives in the database.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Field limits ────────────────────────────────────────────────────────────

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_NATIONALITY_LEN: usize = 50;
pub const MAX_ADDRESS_LEN: usize = 255;
pub const MAX_PASSPORT_ID_LEN: usize = 20;

// ─── PersonDetails ───────────────────────────────────────────────────────────

/// The caller-supplied fields of a record. Every field is required on both
/// create and update; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDetails {
  pub first_name:  String,
  pub last_name:   String,
  pub middle_name: String,
  pub birth_date:  NaiveDate,
  pub nationality: String,
  pub citizenship: String,
  pub address:     String,
  /// Globally unique across all records.
  pub passport_id: String,
}

impl PersonDetails {
  /// Check that every text field is non-blank and within its column limit.
  pub fn validate(&self) -> Result<()> {
    let fields: [(&'static str, &str, usize); 7] = [
      ("first_name", &self.first_name, MAX_NAME_LEN),
      ("last_name", &self.last_name, MAX_NAME_LEN),
      ("middle_name", &self.middle_name, MAX_NAME_LEN),
      ("nationality", &self.nationality, MAX_NATIONALITY_LEN),
      ("citizenship", &self.citizenship, MAX_NATIONALITY_LEN),
      ("address", &self.address, MAX_ADDRESS_LEN),
      ("passport_id", &self.passport_id, MAX_PASSPORT_ID_LEN),
    ];

    for (field, value, max) in fields {
      if value.trim().is_empty() {
        return Err(Error::MissingField(field));
      }
      if value.chars().count() > max {
        return Err(Error::FieldTooLong { field, max });
      }
    }
    Ok(())
  }
}

/// Parse a `YYYY-MM-DD` birth date as submitted in a form.
pub fn parse_birth_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| {
    Error::InvalidField {
      field:  "birth_date",
      reason: e.to_string(),
    }
  })
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::insert`] and
/// [`crate::store::RecordStore::update`]. The `id` is always assigned by the
/// store.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub details: PersonDetails,
  /// Filename of an already-written normalized photo. On update, `None`
  /// leaves the stored reference unchanged.
  pub photo:   Option<String>,
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted record. Serialises flat: `{"id": .., "first_name": .., ...,
/// "photo": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:      i64,
  #[serde(flatten)]
  pub details: PersonDetails,
  pub photo:   Option<String>,
}
