//! Report exporters: an archive of the original images and a single-page
//! document snapshot of the rendered report. Both are independent and
//! leave inspection state untouched on failure.

pub mod archive;
pub mod capture;
pub mod document;

pub use archive::{archive_file_name, export_archive};
pub use capture::{build_capture_view, substitute_modern_colors, CaptureView};
pub use document::{document_file_name, export_document, RasterCapture, RegionRasterizer};

/// Lowercased, whitespace collapsed to underscores; used for download
/// file names. Blank input falls back to the operation's default stem.
fn sanitize_export_stem(name: &str, fallback: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    trimmed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}
