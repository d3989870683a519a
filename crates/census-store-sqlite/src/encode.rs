//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings.

use census_core::person::{Person, PersonDetails};
use chrono::NaiveDate;

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// `true` if `haystack` contains `needle` once both are Unicode-lowercased.
/// `needle` is matched literally; no character has wildcard meaning.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawPerson {
  pub id:          i64,
  pub first_name:  String,
  pub last_name:   String,
  pub middle_name: String,
  pub birth_date:  String,
  pub nationality: String,
  pub citizenship: String,
  pub address:     String,
  pub passport_id: String,
  pub photo:       Option<String>,
}

impl RawPerson {
  /// Read a row selected with [`crate::schema::COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      first_name:  row.get(1)?,
      last_name:   row.get(2)?,
      middle_name: row.get(3)?,
      birth_date:  row.get(4)?,
      nationality: row.get(5)?,
      citizenship: row.get(6)?,
      address:     row.get(7)?,
      passport_id: row.get(8)?,
      photo:       row.get(9)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:      self.id,
      details: PersonDetails {
        first_name:  self.first_name,
        last_name:   self.last_name,
        middle_name: self.middle_name,
        birth_date:  decode_date(&self.birth_date)?,
        nationality: self.nationality,
        citizenship: self.citizenship,
        address:     self.address,
        passport_id: self.passport_id,
      },
      photo:   self.photo,
    })
  }
}
