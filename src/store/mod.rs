//! Image Record Store
//!
//! In-memory ordered collection of uploaded thermographic images with
//! derived display names. Identifiers, not filenames, are the correlation
//! key with classification results; display names are recomputed on every
//! insertion, removal, or asset-name change so they always reflect the
//! record's current 1-based position.

pub mod preview;

use crate::classify::types::Analysis;
use preview::{PreviewHandle, PreviewRegistry};
use uuid::Uuid;

/// An uploaded payload plus its sniffed MIME type.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Exclusively owned original bytes.
    pub data: Vec<u8>,
    /// MIME type detected from magic bytes, defaulting to JPEG.
    pub mime: &'static str,
}

/// One uploaded image plus its optional classification result.
#[derive(Debug)]
pub struct ImageRecord {
    /// Unique token generated at upload, stable for the record's lifetime.
    pub id: String,
    pub file: ImageFile,
    /// Revocable preview reference, released when the record is dropped
    /// from the store.
    pub preview: PreviewHandle,
    /// Derived display label: `"{asset}_{pos}"` or `"Foto {pos}"`.
    pub name: String,
    /// Absent until a classification run succeeds for this record.
    pub analysis: Option<Analysis>,
}

/// Ordered record collection plus the asset name driving display names.
#[derive(Debug, Default)]
pub struct ImageStore {
    asset_name: String,
    records: Vec<ImageRecord>,
    previews: PreviewRegistry,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record per payload: allocate an identifier, derive a
    /// preview, and name the record from its resulting position and the
    /// current asset name. Empty input is a no-op.
    pub fn add(&mut self, payloads: Vec<Vec<u8>>) -> &[ImageRecord] {
        let first_new = self.records.len();

        for data in payloads {
            let mime = detect_image_mime(&data);
            let preview = self.previews.register(&data);
            let position = self.records.len() + 1;
            self.records.push(ImageRecord {
                id: Uuid::new_v4().to_string(),
                file: ImageFile { data, mime },
                preview,
                name: display_name(&self.asset_name, position),
                analysis: None,
            });
        }

        &self.records[first_new..]
    }

    /// Drop the record with a matching identifier, release its preview,
    /// and rename the survivors to their new positions. Returns whether a
    /// record was removed; an unknown id is a silent no-op.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            tracing::debug!(%id, "remove of unknown record id ignored");
            return false;
        };

        let record = self.records.remove(index);
        self.previews.release(&record.preview);
        self.rename_all();
        true
    }

    /// Release every preview, empty the collection, reset the asset name.
    pub fn clear(&mut self) {
        for record in self.records.drain(..) {
            self.previews.release(&record.preview);
        }
        self.asset_name.clear();
    }

    /// Recompute every record's display name for a new asset name.
    /// Ordering and identifiers are untouched.
    pub fn set_asset_name(&mut self, asset_name: &str) {
        self.asset_name = asset_name.to_string();
        self.rename_all();
    }

    fn rename_all(&mut self) {
        for (index, record) in self.records.iter_mut().enumerate() {
            record.name = display_name(&self.asset_name, index + 1);
        }
    }

    /// Attach a classification result to the matching record. Returns
    /// false when the identifier does not belong to the collection.
    pub(crate) fn attach_analysis(&mut self, id: &str, analysis: Analysis) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.analysis = Some(analysis);
                true
            }
            None => false,
        }
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Preview bytes for a record's live handle.
    pub fn preview_bytes(&self, record: &ImageRecord) -> Option<&[u8]> {
        self.previews.get(&record.preview)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Preview release accounting, for leak checks.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }
}

/// `"{asset}_{pos}"` when an asset name is set, else `"Foto {pos}"`.
fn display_name(asset_name: &str, position: usize) -> String {
    let asset = asset_name.trim();
    if asset.is_empty() {
        format!("Foto {position}")
    } else {
        format!("{asset}_{position}")
    }
}

/// Detect image MIME type from magic bytes.
pub fn detect_image_mime(data: &[u8]) -> &'static str {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        "image/png"
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
        "image/webp"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "image/gif"
    } else {
        "image/jpeg" // Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(n: usize) -> Vec<Vec<u8>> {
        // JPEG magic bytes are enough for store-level tests; the preview
        // path falls back to the original bytes when decoding fails.
        (0..n).map(|i| vec![0xFF, 0xD8, 0xFF, i as u8]).collect()
    }

    fn assert_names_consistent(store: &ImageStore) {
        let asset = store.asset_name().trim().to_string();
        for (index, record) in store.records().iter().enumerate() {
            let expected = if asset.is_empty() {
                format!("Foto {}", index + 1)
            } else {
                format!("{}_{}", asset, index + 1)
            };
            assert_eq!(record.name, expected);
        }
    }

    #[test]
    fn add_names_records_by_position() {
        let mut store = ImageStore::new();
        store.set_asset_name("Motor01");
        store.add(payloads(2));

        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Motor01_1", "Motor01_2"]);
    }

    #[test]
    fn add_without_asset_name_uses_foto_labels() {
        let mut store = ImageStore::new();
        store.add(payloads(3));

        let names: Vec<&str> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Foto 1", "Foto 2", "Foto 3"]);
    }

    #[test]
    fn add_empty_input_is_a_noop() {
        let mut store = ImageStore::new();
        assert!(store.add(Vec::new()).is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn names_hold_after_every_mutation() {
        let mut store = ImageStore::new();
        store.add(payloads(3));
        assert_names_consistent(&store);

        store.set_asset_name("Linha 02");
        assert_names_consistent(&store);

        let second = store.records()[1].id.clone();
        store.remove(&second);
        assert_names_consistent(&store);

        store.add(payloads(2));
        assert_names_consistent(&store);

        store.set_asset_name("  ");
        assert_names_consistent(&store);
    }

    #[test]
    fn remove_keeps_other_identifiers_stable() {
        let mut store = ImageStore::new();
        store.set_asset_name("Painel");
        store.add(payloads(3));

        let ids: Vec<String> = store.records().iter().map(|r| r.id.clone()).collect();
        store.remove(&ids[0]);

        let remaining: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(remaining, [ids[1].as_str(), ids[2].as_str()]);
        // Positions shifted, so names did too.
        assert_eq!(store.records()[0].name, "Painel_1");
        assert_eq!(store.records()[1].name, "Painel_2");
    }

    #[test]
    fn remove_unknown_id_is_a_silent_noop() {
        let mut store = ImageStore::new();
        store.add(payloads(1));
        assert!(!store.remove("no-such-id"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_releases_the_preview_exactly_once() {
        let mut store = ImageStore::new();
        store.add(payloads(2));
        let id = store.records()[0].id.clone();

        store.remove(&id);
        assert_eq!(store.previews().released_count(), 1);
        assert_eq!(store.previews().active_count(), 1);
    }

    #[test]
    fn clear_releases_everything_and_resets_asset_name() {
        let mut store = ImageStore::new();
        store.set_asset_name("Motor01");
        store.add(payloads(4));

        store.clear();
        assert!(store.is_empty());
        assert!(store.asset_name().is_empty());
        assert_eq!(store.previews().active_count(), 0);
        assert_eq!(store.previews().issued_count(), 4);
        assert_eq!(store.previews().released_count(), 4);
    }

    #[test]
    fn identifiers_never_collide() {
        let mut store = ImageStore::new();
        store.add(payloads(16));

        let mut ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn mime_is_sniffed_from_magic_bytes() {
        assert_eq!(detect_image_mime(&[0x89, 0x50, 0x4E, 0x47]), "image/png");
        assert_eq!(detect_image_mime(&[0xFF, 0xD8, 0xFF]), "image/jpeg");
        assert_eq!(detect_image_mime(b"GIF89a..."), "image/gif");
        assert_eq!(detect_image_mime(b"garbage"), "image/jpeg");
    }
}
