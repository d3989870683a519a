//! Error type for `census-photo`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("could not decode image: {0}")]
  Decode(#[source] image::ImageError),

  #[error("invalid image dimensions {width}x{height}")]
  InvalidDimensions { width: u32, height: u32 },

  #[error("could not encode image: {0}")]
  Encode(#[source] image::ImageError),

  #[error("invalid photo filename: {0:?}")]
  InvalidFilename(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
