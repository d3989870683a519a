//! SQL schema for the Census SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    middle_name  TEXT NOT NULL,
    birth_date   TEXT NOT NULL,   -- YYYY-MM-DD
    nationality  TEXT NOT NULL,
    citizenship  TEXT NOT NULL,
    address      TEXT NOT NULL,
    passport_id  TEXT NOT NULL UNIQUE,
    photo        TEXT             -- filename under the upload directory
);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT` and `RETURNING` clause; the order
/// matches [`crate::encode::RawPerson::from_row`].
pub const COLUMNS: &str = "id, first_name, last_name, middle_name, birth_date, \
                           nationality, citizenship, address, passport_id, photo";
