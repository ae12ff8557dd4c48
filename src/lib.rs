//! termoscan — client library for AI-assisted thermographic inspection.
//!
//! A technician's uploads flow one direction per run: payloads enter the
//! [`store::ImageStore`], one batched request goes to the hosted
//! vision-language model through [`classify::GeminiClient`], the
//! [`orchestrator::Inspection`] merges results back by identifier, and
//! the [`export`] module produces the shareable archive and the printable
//! report snapshot. Severity classification is delegated entirely to the
//! remote service; this crate performs upload bookkeeping, request
//! assembly, and presentation support only.

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod orchestrator;
pub mod store;

pub use classify::{Analysis, Classifier, GeminiClient, Status};
pub use config::ClassifierConfig;
pub use error::{ClassifyError, Error, ExportError, Result};
pub use orchestrator::{Inspection, Phase};
pub use store::{ImageRecord, ImageStore};

use tracing_subscriber::EnvFilter;

/// Initialize tracing with the RUST_LOG env filter.
/// Default: warn for dependencies, info for this crate.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,termoscan=info")),
        )
        .try_init();
}
