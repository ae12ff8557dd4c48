//! Capture-safe presentation adapter for the document exporter.
//!
//! Rasterizers in scope only understand a fixed set of primitive visual
//! rules: modern color syntax must be substituted before capture, and the
//! branding header is reconstructed into the capture view without
//! mutating the live report.

use crate::classify::types::Status;
use crate::store::ImageStore;
use chrono::{DateTime, Utc};

/// The fixed hex palette — the only colors a capture may carry.
pub mod palette {
    pub const PAGE_BACKGROUND: &str = "#f8fafc";
    pub const SURFACE: &str = "#ffffff";
    pub const INK: &str = "#0f172a";
    pub const MUTED: &str = "#64748b";
    pub const ACCENT: &str = "#059669";
    pub const BORDER: &str = "#e2e8f0";

    pub const OK_BACKGROUND: &str = "#f0fdf4";
    pub const OK_INK: &str = "#166534";
    pub const ALERT_BACKGROUND: &str = "#fffbeb";
    pub const ALERT_INK: &str = "#92400e";
    pub const CRITICAL_BACKGROUND: &str = "#fef2f2";
    pub const CRITICAL_INK: &str = "#991b1b";
}

/// Badge colors for a severity status, from the fixed palette.
pub fn badge_colors(status: Status) -> (&'static str, &'static str) {
    match status {
        Status::Ok => (palette::OK_BACKGROUND, palette::OK_INK),
        Status::Alert => (palette::ALERT_BACKGROUND, palette::ALERT_INK),
        Status::Critical => (palette::CRITICAL_BACKGROUND, palette::CRITICAL_INK),
    }
}

/// Presentation-only branding block reconstructed into every capture.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureHeader {
    pub product: String,
    pub tagline: String,
    pub title: String,
    pub norms: String,
}

impl Default for CaptureHeader {
    fn default() -> Self {
        Self {
            product: "TermoScan".to_string(),
            tagline: "Intelligent Thermal Analysis System".to_string(),
            title: "RELATÓRIO TÉCNICO".to_string(),
            norms: "NBR 16818 / NBR 15572".to_string(),
        }
    }
}

/// One row of the captured results table.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRow {
    pub record_name: String,
    pub temperature: String,
    pub status: Option<Status>,
    pub norm_compliance: String,
    pub description: String,
    pub recommendation: String,
}

/// Renderable snapshot of the report region, decoupled from the live
/// store. Built fresh for each export; the store itself is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureView {
    pub header: CaptureHeader,
    pub asset_name: String,
    pub date: DateTime<Utc>,
    pub rows: Vec<CaptureRow>,
    pub background: &'static str,
}

/// Clone the report data into a capture-safe view with the branding
/// header prepended.
pub fn build_capture_view(store: &ImageStore, date: DateTime<Utc>) -> CaptureView {
    let rows = store
        .records()
        .iter()
        .map(|record| match &record.analysis {
            Some(analysis) => CaptureRow {
                record_name: record.name.clone(),
                temperature: analysis.temperature_found.clone(),
                status: Some(analysis.status),
                norm_compliance: analysis.norm_compliance.clone(),
                description: analysis.description.clone(),
                recommendation: analysis.recommendation.clone(),
            },
            None => CaptureRow {
                record_name: record.name.clone(),
                temperature: "—".to_string(),
                status: None,
                norm_compliance: "—".to_string(),
                description: "Sem análise".to_string(),
                recommendation: "—".to_string(),
            },
        })
        .collect();

    CaptureView {
        header: CaptureHeader::default(),
        asset_name: store.asset_name().trim().to_string(),
        date,
        rows,
        background: palette::PAGE_BACKGROUND,
    }
}

/// Replace `oklch()`/`oklab()` color functions, which the rasterizer
/// cannot parse, with the surface fallback from the fixed palette.
pub fn substitute_modern_colors(stylesheet: &str) -> String {
    let mut out = String::with_capacity(stylesheet.len());
    let mut rest = stylesheet;

    while let Some(start) = next_modern_fn(rest) {
        out.push_str(&rest[..start]);
        let after = &rest[start..];
        match after.find(')') {
            Some(close) => {
                out.push_str(palette::SURFACE);
                rest = &after[close + 1..];
            }
            None => {
                // Unterminated function, keep the tail untouched.
                out.push_str(after);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

fn next_modern_fn(s: &str) -> Option<usize> {
    ["oklch(", "oklab("]
        .iter()
        .filter_map(|pattern| s.find(pattern))
        .min()
}
