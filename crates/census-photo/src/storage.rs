//! [`PhotoDir`] — the directory that owns normalized photo files.

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::{Error, NormalizedPhoto, Result};

/// A normalized photo that has been written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
  /// Bare filename, relative to the [`PhotoDir`] root. This is what records
  /// reference and what `/uploads/` serves.
  pub filename: String,
}

/// A flat directory of uniquely named photo files.
///
/// Cloning is cheap; clones share the same root.
#[derive(Debug, Clone)]
pub struct PhotoDir {
  root: PathBuf,
}

impl PhotoDir {
  /// Use `root` as the photo directory, creating it if absent.
  pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    tokio::fs::create_dir_all(&root).await?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path { &self.root }

  /// Write `photo` under a fresh `processed-<uuid>.<ext>` name.
  pub async fn save(&self, photo: &NormalizedPhoto) -> Result<StoredPhoto> {
    let filename = format!("processed-{}.{}", Uuid::new_v4(), photo.extension());
    tokio::fs::write(self.root.join(&filename), &photo.bytes).await?;
    tracing::debug!(%filename, bytes = photo.bytes.len(), "photo written");
    Ok(StoredPhoto { filename })
  }

  /// Delete a stored photo. A file that is already gone is not an error.
  pub async fn remove(&self, filename: &str) -> Result<()> {
    let path = self.path_of(filename)?;
    match tokio::fs::remove_file(&path).await {
      Ok(()) => {
        tracing::debug!(%filename, "photo removed");
        Ok(())
      }
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }

  /// Resolve `filename` inside the root. Anything that could escape the
  /// directory is rejected.
  pub fn path_of(&self, filename: &str) -> Result<PathBuf> {
    let bare = !filename.is_empty()
      && filename != "."
      && filename != ".."
      && !filename.contains(['/', '\\']);
    if !bare {
      return Err(Error::InvalidFilename(filename.to_owned()));
    }
    Ok(self.root.join(filename))
  }
}

#[cfg(test)]
mod tests {
  use image::ImageFormat;

  use super::*;
  use crate::CropWindow;

  fn photo() -> NormalizedPhoto {
    NormalizedPhoto {
      bytes:  vec![1, 2, 3, 4],
      format: ImageFormat::Png,
      window: CropWindow { left: 0, top: 0, width: 4, height: 3 },
    }
  }

  #[tokio::test]
  async fn open_creates_missing_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("nested").join("uploads");
    let dir = PhotoDir::open(&root).await.unwrap();
    assert!(dir.root().is_dir());
  }

  #[tokio::test]
  async fn save_writes_unique_files() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = PhotoDir::open(tmp.path()).await.unwrap();

    let a = dir.save(&photo()).await.unwrap();
    let b = dir.save(&photo()).await.unwrap();
    assert_ne!(a.filename, b.filename);
    assert!(a.filename.starts_with("processed-"));
    assert!(a.filename.ends_with(".png"));

    let written = std::fs::read(dir.path_of(&a.filename).unwrap()).unwrap();
    assert_eq!(written, vec![1, 2, 3, 4]);
  }

  #[tokio::test]
  async fn remove_is_idempotent() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = PhotoDir::open(tmp.path()).await.unwrap();
    let stored = dir.save(&photo()).await.unwrap();

    dir.remove(&stored.filename).await.unwrap();
    assert!(!dir.path_of(&stored.filename).unwrap().exists());
    dir.remove(&stored.filename).await.unwrap();
  }

  #[test]
  fn path_of_rejects_traversal() {
    let dir = PhotoDir { root: PathBuf::from("/srv/uploads") };
    for bad in ["", ".", "..", "../etc/passwd", "a/b.png", "a\\b.png"] {
      assert!(
        matches!(dir.path_of(bad), Err(Error::InvalidFilename(_))),
        "{bad:?} accepted"
      );
    }
    assert_eq!(
      dir.path_of("processed-x.png").unwrap(),
      PathBuf::from("/srv/uploads/processed-x.png")
    );
  }
}
