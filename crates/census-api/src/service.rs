//! [`RecordService`] — validation, photo ingestion, and commit.
//!
//! Writes that carry a photo are a two-step saga: the normalized file is
//! written first, then the record referencing it is committed. The database
//! therefore never points at a missing file. If the commit fails, the new
//! file is an orphan; it is logged and removed before the error is returned.

use std::sync::Arc;

use bytes::Bytes;
use census_core::{
  Error, Result,
  person::{NewPerson, Person, PersonDetails},
  store::{RecordStore, StoreError},
};
use census_photo::PhotoDir;
use tracing::{debug, info, instrument, warn};

/// Orchestrates record writes over an injected store and photo directory.
pub struct RecordService<S> {
  store:  Arc<S>,
  photos: PhotoDir,
}

impl<S: RecordStore> RecordService<S> {
  pub fn new(store: Arc<S>, photos: PhotoDir) -> Self { Self { store, photos } }

  pub fn photos(&self) -> &PhotoDir { &self.photos }

  #[instrument(name = "census.search", skip(self))]
  pub async fn search(&self, query: &str) -> Result<Vec<Person>> {
    if query.is_empty() {
      return Err(Error::EmptyQuery);
    }
    self.store.search(query).await.map_err(store_error)
  }

  pub async fn list(&self) -> Result<Vec<Person>> {
    self.store.list().await.map_err(store_error)
  }

  pub async fn get(&self, id: i64) -> Result<Person> {
    self
      .store
      .get(id)
      .await
      .map_err(store_error)?
      .ok_or(Error::NotFound(id))
  }

  #[instrument(
    name = "census.create",
    skip_all,
    fields(passport_id = %details.passport_id, with_photo = photo.is_some())
  )]
  pub async fn create(
    &self,
    details: PersonDetails,
    photo: Option<Bytes>,
  ) -> Result<Person> {
    details.validate()?;

    let filename = match photo {
      Some(bytes) => Some(self.ingest(bytes).await?),
      None => None,
    };

    let input = NewPerson { details, photo: filename.clone() };
    match self.store.insert(input).await {
      Ok(person) => {
        info!(id = person.id, "person created");
        Ok(person)
      }
      Err(e) => {
        self.discard_orphan(filename).await;
        Err(store_error(e))
      }
    }
  }

  /// Replace every field of record `id`. The photo reference changes only
  /// when a new photo is supplied; the previous file is left in place.
  #[instrument(
    name = "census.update",
    skip_all,
    fields(id = id, passport_id = %details.passport_id, with_photo = photo.is_some())
  )]
  pub async fn update(
    &self,
    id: i64,
    details: PersonDetails,
    photo: Option<Bytes>,
  ) -> Result<Person> {
    details.validate()?;

    // Nothing is written for a record that does not exist.
    self.get(id).await?;

    let filename = match photo {
      Some(bytes) => Some(self.ingest(bytes).await?),
      None => None,
    };

    // `None` keeps whatever photo the row holds at commit time.
    let input = NewPerson { details, photo: filename.clone() };
    match self.store.update(id, input).await {
      Ok(Some(person)) => {
        info!("person updated");
        Ok(person)
      }
      // Deleted between the lookup and the write.
      Ok(None) => {
        self.discard_orphan(filename).await;
        Err(Error::NotFound(id))
      }
      Err(e) => {
        self.discard_orphan(filename).await;
        Err(store_error(e))
      }
    }
  }

  /// Remove record `id` and then its photo file. The record is gone even if
  /// the file cannot be removed.
  #[instrument(name = "census.delete", skip(self))]
  pub async fn delete(&self, id: i64) -> Result<Person> {
    let removed = self
      .store
      .delete(id)
      .await
      .map_err(store_error)?
      .ok_or(Error::NotFound(id))?;

    if let Some(filename) = &removed.photo
      && let Err(e) = self.photos.remove(filename).await
    {
      warn!(%filename, error = %e, "could not remove photo of deleted person");
    }

    info!("person deleted");
    Ok(removed)
  }

  /// Normalize an upload on the blocking pool and write it to the photo
  /// directory. Returns the stored filename.
  async fn ingest(&self, bytes: Bytes) -> Result<String> {
    let photo = tokio::task::spawn_blocking(move || census_photo::normalize(&bytes))
      .await
      .map_err(Error::storage)?
      .map_err(photo_error)?;

    let stored = self.photos.save(&photo).await.map_err(photo_error)?;
    debug!(
      filename = %stored.filename,
      left = photo.window.left,
      top = photo.window.top,
      width = photo.window.width,
      height = photo.window.height,
      "photo normalized"
    );
    Ok(stored.filename)
  }

  async fn discard_orphan(&self, filename: Option<String>) {
    let Some(filename) = filename else { return };
    warn!(%filename, "commit failed after photo write; removing orphan");
    if let Err(e) = self.photos.remove(&filename).await {
      warn!(%filename, error = %e, "orphaned photo left on disk");
    }
  }
}

fn store_error<E: StoreError>(e: E) -> Error {
  match e.duplicate_passport() {
    Some(id) => Error::DuplicatePassport(id.to_owned()),
    None => Error::storage(e),
  }
}

fn photo_error(e: census_photo::Error) -> Error {
  match e {
    census_photo::Error::Decode(e) => Error::ImageDecode(e.to_string()),
    census_photo::Error::InvalidDimensions { width, height } => {
      Error::InvalidDimensions { width, height }
    }
    other => Error::storage(other),
  }
}
