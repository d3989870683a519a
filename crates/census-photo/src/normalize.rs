//! Decode, crop to 4:3, re-encode.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use crate::{
  Error, Result,
  geometry::{CropWindow, crop_window},
};

/// An encoded, cropped image ready to be written to disk.
#[derive(Debug, Clone)]
pub struct NormalizedPhoto {
  pub bytes:  Vec<u8>,
  pub format: ImageFormat,
  /// Where the crop was taken from in the source image.
  pub window: CropWindow,
}

impl NormalizedPhoto {
  /// Canonical file extension for [`Self::format`].
  pub fn extension(&self) -> &'static str {
    match self.format {
      ImageFormat::Jpeg => "jpg",
      ImageFormat::Gif => "gif",
      ImageFormat::WebP => "webp",
      ImageFormat::Bmp => "bmp",
      _ => "png",
    }
  }
}

/// Center-crop an encoded image to 4:3.
///
/// The format is detected from the content, not from any filename. The
/// output keeps the input's format when it is one we can write, and falls
/// back to PNG otherwise. The window is computed from the decoded image's
/// own dimensions.
///
/// CPU-bound; async callers should run it on a blocking thread.
pub fn normalize(bytes: &[u8]) -> Result<NormalizedPhoto> {
  let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
  let detected = reader.format();
  let source = reader.decode().map_err(Error::Decode)?;

  let window = crop_window(source.width(), source.height())?;
  let cropped = source.crop_imm(window.left, window.top, window.width, window.height);

  let format = match detected {
    Some(
      f @ (ImageFormat::Png
      | ImageFormat::Jpeg
      | ImageFormat::Gif
      | ImageFormat::WebP
      | ImageFormat::Bmp),
    ) => f,
    _ => ImageFormat::Png,
  };

  let mut out = Cursor::new(Vec::new());
  cropped.write_to(&mut out, format).map_err(Error::Encode)?;

  Ok(NormalizedPhoto { bytes: out.into_inner(), format, window })
}
