//! Document exporter.
//!
//! Captures the rendered report region as a raster image through the
//! rendering-engine seam, then embeds it as a single PDF page whose
//! dimensions equal the capture's pixel size at 2× scale.

use super::capture::{build_capture_view, CaptureView};
use super::sanitize_export_stem;
use crate::error::ExportError;
use crate::store::ImageStore;
use printpdf::{Image, ImageTransform, Mm, PdfDocument};

/// Captures are taken at 2× the layout size for print sharpness.
pub const CAPTURE_SCALE: f32 = 2.0;

/// Pixel density assumed when sizing the page to the capture.
const CAPTURE_DPI: f64 = 96.0;

const DEFAULT_STEM: &str = "relatorio_termografia";

/// Rasterized capture of the report region.
pub struct RasterCapture {
    pub width_px: u32,
    pub height_px: u32,
    /// PNG-encoded pixels.
    pub png: Vec<u8>,
}

/// Rendering-engine seam: rasterizes a capture-safe view of the report.
pub trait RegionRasterizer {
    fn rasterize(&self, view: &CaptureView, scale: f32) -> Result<RasterCapture, ExportError>;
}

/// Suggested download name: `{sanitized-asset}.pdf`.
pub fn document_file_name(asset_name: &str) -> String {
    format!("{}.pdf", sanitize_export_stem(asset_name, DEFAULT_STEM))
}

/// Capture the report region and embed it as one page sized to the
/// capture. The live report state is never mutated.
pub fn export_document<R: RegionRasterizer + ?Sized>(
    rasterizer: &R,
    store: &ImageStore,
) -> Result<Vec<u8>, ExportError> {
    let view = build_capture_view(store, chrono::Utc::now());
    let capture = rasterizer.rasterize(&view, CAPTURE_SCALE)?;

    if capture.width_px == 0 || capture.height_px == 0 {
        return Err(ExportError::Rasterize("empty capture region".to_string()));
    }

    // Decode with printpdf's bundled image crate so the embedded type matches.
    let decoded = printpdf::image_crate::load_from_memory_with_format(
        &capture.png,
        printpdf::image_crate::ImageFormat::Png,
    )
    .map_err(|e| ExportError::Rasterize(format!("capture is not a decodable PNG: {e}")))?;
    if decoded.width() != capture.width_px || decoded.height() != capture.height_px {
        return Err(ExportError::Rasterize(format!(
            "capture dimensions {}x{} do not match declared {}x{}",
            decoded.width(),
            decoded.height(),
            capture.width_px,
            capture.height_px
        )));
    }

    let (doc, page, layer) = PdfDocument::new(
        "Relatório de Inspeção Termográfica",
        Mm(px_to_mm(capture.width_px) as f32),
        Mm(px_to_mm(capture.height_px) as f32),
        "report",
    );

    let pdf_image = Image::from_dynamic_image(&decoded);
    pdf_image.add_to_layer(
        doc.get_page(page).get_layer(layer),
        ImageTransform {
            dpi: Some(CAPTURE_DPI as f32),
            ..Default::default()
        },
    );

    tracing::info!(
        width_px = capture.width_px,
        height_px = capture.height_px,
        "document export complete"
    );

    doc.save_to_bytes()
        .map_err(|e| ExportError::Document(format!("failed to serialize PDF: {e}")))
}

fn px_to_mm(px: u32) -> f64 {
    px as f64 * 25.4 / CAPTURE_DPI
}
