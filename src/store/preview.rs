//! Preview resource lifecycle.
//!
//! Previews are revocable references to a renderable, downscaled copy of
//! an uploaded payload. The registry owns the preview bytes; a handle is
//! valid from `register` until `release`, and every handle must be
//! released exactly once when its record is removed or the collection is
//! cleared.

use image::{imageops::FilterType, ImageFormat};
use std::collections::HashMap;
use std::io::Cursor;

/// Maximum preview dimension (width or height).
const PREVIEW_SIZE: u32 = 256;

/// Revocable reference to a preview held by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewHandle(u64);

/// Owns preview bytes and tracks their release.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: u64,
    active: HashMap<u64, Vec<u8>>,
    issued: u64,
    released: u64,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive and register a preview for an image payload.
    ///
    /// Falls back to the original bytes when the payload cannot be
    /// decoded, so a bad file never fails the upload batch.
    pub fn register(&mut self, payload: &[u8]) -> PreviewHandle {
        let bytes = match derive_thumbnail(payload) {
            Ok(thumb) => thumb,
            Err(e) => {
                tracing::warn!("preview derivation failed, keeping original bytes: {}", e);
                payload.to_vec()
            }
        };

        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id, bytes);
        self.issued += 1;
        PreviewHandle(id)
    }

    /// Release a preview. A handle that was never issued or was already
    /// released is ignored with a warning; the double release is a bug in
    /// the caller, not a reason to corrupt accounting.
    pub fn release(&mut self, handle: &PreviewHandle) {
        if self.active.remove(&handle.0).is_some() {
            self.released += 1;
        } else {
            tracing::warn!(handle = handle.0, "release of unknown or already released preview");
        }
    }

    /// Preview bytes for a live handle. `None` after release.
    pub fn get(&self, handle: &PreviewHandle) -> Option<&[u8]> {
        self.active.get(&handle.0).map(|b| b.as_slice())
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn issued_count(&self) -> u64 {
        self.issued
    }

    pub fn released_count(&self) -> u64 {
        self.released
    }
}

/// Downscale and re-encode a payload as a JPEG thumbnail.
fn derive_thumbnail(payload: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let img = image::load_from_memory(payload)?;
    let thumb = img.resize(PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Lanczos3);

    let mut buffer = Cursor::new(Vec::new());
    thumb.write_to(&mut buffer, ImageFormat::Jpeg)?;
    Ok(buffer.into_inner())
}
