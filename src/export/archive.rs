//! Archive exporter.
//!
//! Packages every record's original payload under a folder named after
//! the asset. An empty record set is permitted and yields an empty
//! archive.

use super::sanitize_export_stem;
use crate::error::ExportError;
use crate::store::ImageStore;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const DEFAULT_FOLDER: &str = "termografias";

/// Suggested download name: `{sanitized-asset}_analise.zip`.
pub fn archive_file_name(asset_name: &str) -> String {
    format!("{}_analise.zip", sanitize_export_stem(asset_name, DEFAULT_FOLDER))
}

/// Serialize the archive: one `{folder}/{record.name}.jpg` entry per
/// record, holding the original bytes.
pub fn export_archive(store: &ImageStore) -> Result<Vec<u8>, ExportError> {
    let trimmed = store.asset_name().trim();
    let folder = if trimmed.is_empty() { DEFAULT_FOLDER } else { trimmed };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer
        .add_directory(folder, options)
        .map_err(|e| ExportError::Archive(format!("failed to create folder entry: {e}")))?;

    for record in store.records() {
        writer
            .start_file(format!("{folder}/{}.jpg", record.name), options)
            .map_err(|e| ExportError::Archive(format!("failed to start entry for {}: {e}", record.name)))?;
        writer
            .write_all(&record.file.data)
            .map_err(|e| ExportError::Archive(format!("failed to write entry for {}: {e}", record.name)))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| ExportError::Archive(format!("failed to finish archive: {e}")))?;

    tracing::info!(folder, records = store.len(), "archive export complete");
    Ok(cursor.into_inner())
}
