//! Crop-window arithmetic for the 4:3 center crop.

use crate::{Error, Result};

/// A rectangle inside the source image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
  pub left:   u32,
  pub top:    u32,
  pub width:  u32,
  pub height: u32,
}

/// Compute the largest centered 4:3 window inside a `width` x `height` image.
///
/// The full width is kept when `round(width * 3/4)` fits; otherwise the full
/// height is kept and the width becomes `round(height * 4/3)`. The window is
/// centered, so the two margins on each axis differ by at most one pixel.
pub fn crop_window(width: u32, height: u32) -> Result<CropWindow> {
  if width == 0 || height == 0 {
    return Err(Error::InvalidDimensions { width, height });
  }

  let (w, h) = (f64::from(width), f64::from(height));

  let candidate_height = round(w * 3.0 / 4.0);
  let (crop_width, crop_height) = if candidate_height <= height {
    (width, candidate_height)
  } else {
    (round(h * 4.0 / 3.0).min(width), height)
  };

  Ok(CropWindow {
    left:   round(f64::from(width - crop_width) / 2.0),
    top:    round(f64::from(height - crop_height) / 2.0),
    width:  crop_width,
    height: crop_height,
  })
}

// Half-away-from-zero; every input here is non-negative and below 2^32.
fn round(x: f64) -> u32 { x.round() as u32 }
