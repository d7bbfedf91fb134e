//! Source image loading.
//!
//! File loading is confined to a base directory: the resolved target
//! (symlinks followed) must stay inside the resolved base.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use tracing::debug;

use crate::{RasterError, Result};

/// Resolve `rel_path` against `base_dir`, following symlinks, and reject
/// anything that lands outside the resolved base.
pub fn resolve_in_base(base_dir: impl AsRef<Path>, rel_path: impl AsRef<Path>) -> Result<PathBuf> {
    let base = base_dir.as_ref().canonicalize()?;
    let target = base.join(rel_path.as_ref()).canonicalize()?;

    if !target.starts_with(&base) {
        return Err(RasterError::PathOutsideBase(target));
    }
    Ok(target)
}

/// Load and decode an image at `rel_path` inside `base_dir`.
pub fn load_from_file(base_dir: impl AsRef<Path>, rel_path: impl AsRef<Path>) -> Result<DynamicImage> {
    let target = resolve_in_base(base_dir, rel_path)?;
    let img = image::ImageReader::open(&target)?
        .with_guessed_format()?
        .decode()?;
    debug!(
        path = %target.display(),
        width = img.width(),
        height = img.height(),
        "Loaded image from file"
    );
    Ok(img)
}

/// Load a text file at `rel_path` inside `base_dir` holding base64 image data.
pub fn load_from_base64_file(
    base_dir: impl AsRef<Path>,
    rel_path: impl AsRef<Path>,
) -> Result<DynamicImage> {
    let target = resolve_in_base(base_dir, rel_path)?;
    let text = std::fs::read_to_string(&target)?;
    debug!(path = %target.display(), len = text.len(), "Read base64 image file");
    load_from_base64(&text)
}

/// Decode a base64-encoded image (PNG, JPEG, BMP or GIF).
pub fn load_from_base64(data: &str) -> Result<DynamicImage> {
    let bytes = STANDARD.decode(data.trim())?;
    let img = image::load_from_memory(&bytes)?;
    debug!(width = img.width(), height = img.height(), "Decoded base64 image");
    Ok(img)
}
