//! Classification of thermographic images by the hosted model.

pub mod client;
pub mod prompt;
pub mod types;

pub use client::{Classifier, GeminiClient};
pub use types::{Analysis, Status};
