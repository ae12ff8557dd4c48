//! Configuration for the hosted classification service.

/// Connection settings for the classification service.
///
/// The API key is the single credential the client carries; everything
/// else has a working default.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// API key for the service.
    pub api_key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Model to use.
    pub model: String,

    /// Request timeout in seconds. No retry is attempted on expiry.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            timeout_secs: 120,
        }
    }
}

impl ClassifierConfig {
    /// Load the credential from `GEMINI_API_KEY`, reading a `.env` file
    /// when one is present in the working directory.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set; classification runs will fail");
        }

        Self {
            api_key,
            ..Default::default()
        }
    }
}
