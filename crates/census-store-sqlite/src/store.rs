//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use census_core::{
  person::{NewPerson, Person},
  store::RecordStore,
};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};

use crate::{
  Error, Result,
  encode::{RawPerson, contains_ci, encode_date},
  schema::{COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Census record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "sqlite store open");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the connection, flushing anything SQLite still holds.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` with an optional `?1` parameter and decode every row.
  async fn query_people(
    &self,
    sql: String,
    param: Option<String>,
  ) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match param {
          Some(p) => stmt
            .query_map(rusqlite::params![p], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}

// ─── SQL functions ───────────────────────────────────────────────────────────

/// Register `contains_ci(text, needle)`, a Unicode case-insensitive literal
/// substring test. SQLite's own `LIKE` folds ASCII only.
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "contains_ci",
    2,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let haystack: String = ctx.get(0)?;
      let needle: String = ctx.get(1)?;
      Ok(contains_ci(&haystack, &needle))
    },
  )
}

// ─── Uniqueness violations ───────────────────────────────────────────────────

/// Outcome of a write that may trip the `passport_id` constraint.
enum Written<T> {
  Row(T),
  Duplicate,
}

/// Turn a `SQLITE_CONSTRAINT_UNIQUE` failure into [`Written::Duplicate`];
/// every other error propagates.
fn classify<T>(result: rusqlite::Result<T>) -> tokio_rusqlite::Result<Written<T>> {
  match result {
    Ok(v) => Ok(Written::Row(v)),
    Err(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      Ok(Written::Duplicate)
    }
    Err(e) => Err(e.into()),
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, input: NewPerson) -> Result<Person> {
    let NewPerson { details: d, photo } = input;
    let passport_id = d.passport_id.clone();
    let birth_date  = encode_date(d.birth_date);

    let written = self
      .conn
      .call(move |conn| {
        classify(conn.query_row(
          &format!(
            "INSERT INTO users (
               first_name, last_name, middle_name, birth_date,
               nationality, citizenship, address, passport_id, photo
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {COLUMNS}"
          ),
          rusqlite::params![
            d.first_name,
            d.last_name,
            d.middle_name,
            birth_date,
            d.nationality,
            d.citizenship,
            d.address,
            d.passport_id,
            photo,
          ],
          RawPerson::from_row,
        ))
      })
      .await?;

    match written {
      Written::Row(raw) => raw.into_person(),
      Written::Duplicate => Err(Error::DuplicatePassport(passport_id)),
    }
  }

  async fn get(&self, id: i64) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list(&self) -> Result<Vec<Person>> {
    self
      .query_people(format!("SELECT {COLUMNS} FROM users ORDER BY id"), None)
      .await
  }

  async fn search<'a>(&'a self, text: &'a str) -> Result<Vec<Person>> {
    let sql = format!(
      "SELECT {COLUMNS} FROM users
       WHERE contains_ci(first_name, ?1)
          OR contains_ci(last_name, ?1)
          OR contains_ci(nationality, ?1)
       ORDER BY id"
    );
    self.query_people(sql, Some(text.to_owned())).await
  }

  async fn update(&self, id: i64, input: NewPerson) -> Result<Option<Person>> {
    let NewPerson { details: d, photo } = input;
    let passport_id = d.passport_id.clone();
    let birth_date  = encode_date(d.birth_date);

    let written = self
      .conn
      .call(move |conn| {
        classify(
          conn
            .query_row(
              &format!(
                "UPDATE users SET
                   first_name = ?1, last_name = ?2, middle_name = ?3,
                   birth_date = ?4, nationality = ?5, citizenship = ?6,
                   address = ?7, passport_id = ?8, photo = COALESCE(?9, photo)
                 WHERE id = ?10
                 RETURNING {COLUMNS}"
              ),
              rusqlite::params![
                d.first_name,
                d.last_name,
                d.middle_name,
                birth_date,
                d.nationality,
                d.citizenship,
                d.address,
                d.passport_id,
                photo,
                id,
              ],
              RawPerson::from_row,
            )
            .optional(),
        )
      })
      .await?;

    match written {
      Written::Row(raw) => raw.map(RawPerson::into_person).transpose(),
      Written::Duplicate => Err(Error::DuplicatePassport(passport_id)),
    }
  }

  async fn delete(&self, id: i64) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("DELETE FROM users WHERE id = ?1 RETURNING {COLUMNS}"),
            rusqlite::params![id],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }
}
