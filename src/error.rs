//! Error taxonomy for the inspection client.
//!
//! Classification failures are distinguished internally for logging but
//! surfaced to the presentation layer as a single failed run; export
//! failures are a separate user-visible category and leave prior state
//! untouched.

use thiserror::Error;

/// Failure of one classification run against the hosted model.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Credential missing or rejected by the service.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Transport failure or service-side error status.
    #[error("classification service error: {0}")]
    Service(String),

    /// Body empty, unparsable, or violating the declared response schema.
    #[error("malformed classification response: {0}")]
    ResponseFormat(String),
}

/// Failure of an export operation.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("archive export failed: {0}")]
    Archive(String),

    /// The report region could not be captured as a raster image.
    #[error("report capture failed: {0}")]
    Rasterize(String),

    #[error("document export failed: {0}")]
    Document(String),
}

/// Top-level error surfaced to the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Blocked locally before any remote call was made.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
