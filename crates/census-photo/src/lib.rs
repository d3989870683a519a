//! Photo ingestion for Census.
//!
//! Uploaded images are center-cropped to an exact 4:3 width:height ratio
//! once, at ingestion time, and written to a directory of uniquely named
//! files. Nothing here knows about records; callers keep the returned
//! filename.

mod geometry;
mod normalize;
mod storage;

pub mod error;

pub use error::{Error, Result};
pub use geometry::{CropWindow, crop_window};
pub use normalize::{NormalizedPhoto, normalize};
pub use storage::{PhotoDir, StoredPhoto};
