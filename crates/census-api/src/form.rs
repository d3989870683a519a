//! Multipart form decoding for `POST /users` and `PUT /users/{id}`.

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;
use census_core::{
  Error,
  person::{PersonDetails, parse_birth_date},
};

use crate::error::ApiError;

/// Name of the optional file part.
pub const PHOTO_FIELD: &str = "photo";

const TEXT_FIELDS: [&str; 8] = [
  "first_name",
  "last_name",
  "middle_name",
  "birth_date",
  "nationality",
  "citizenship",
  "address",
  "passport_id",
];

/// A decoded person form: every required field plus the raw photo upload.
#[derive(Debug)]
pub struct PersonForm {
  pub details: PersonDetails,
  pub photo:   Option<Bytes>,
}

impl PersonForm {
  /// Read every part of `multipart`. Unknown parts are ignored, and an empty
  /// `photo` part (a browser form with no file chosen) counts as absent.
  pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
    let mut text: HashMap<&'static str, String> = HashMap::new();
    let mut photo = None;

    while let Some(field) = multipart.next_field().await? {
      let Some(name) = field.name().map(str::to_owned) else { continue };

      if name == PHOTO_FIELD {
        let bytes = field.bytes().await?;
        if !bytes.is_empty() {
          photo = Some(bytes);
        }
      } else if let Some(key) = TEXT_FIELDS.iter().find(|k| **k == name) {
        text.insert(*key, field.text().await?);
      }
    }

    let mut take = |field: &'static str| {
      text.remove(field).ok_or(Error::MissingField(field))
    };

    let details = PersonDetails {
      first_name:  take("first_name")?,
      last_name:   take("last_name")?,
      middle_name: take("middle_name")?,
      birth_date:  parse_birth_date(&take("birth_date")?)?,
      nationality: take("nationality")?,
      citizenship: take("citizenship")?,
      address:     take("address")?,
      passport_id: take("passport_id")?,
    };

    Ok(Self { details, photo })
  }
}
