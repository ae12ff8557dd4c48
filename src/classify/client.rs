//! Classification client for the hosted vision-language model.
//!
//! Issues exactly one batched `generateContent` call per analysis run:
//! the fixed instruction prompt, then for each record a text label
//! carrying its identifier followed by the base64 payload. The remote
//! service is the sole authority on temperature extraction and status
//! classification; the declared response schema is validated strictly on
//! receipt.

use super::prompt;
use super::types::{response_schema, Analysis, AnalysisResponse};
use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use crate::store::ImageRecord;
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Seam between the orchestrator and the remote model.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// One batched request covering `records`; the result is keyed by
    /// record identifier. Identifiers omitted by the service simply have
    /// no entry; a response that does not match the declared schema fails
    /// the whole run.
    async fn classify(
        &self,
        records: &[ImageRecord],
    ) -> Result<HashMap<String, Analysis>, ClassifyError>;
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    config: ClassifierConfig,
}

impl GeminiClient {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClassifyError::Service(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Assemble the single batched request body.
    fn build_request(&self, records: &[ImageRecord]) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(1 + records.len() * 2);
        parts.push(Part::Text {
            text: prompt::instruction(),
        });

        for record in records {
            parts.push(Part::Text {
                text: prompt::image_label(&record.id),
            });
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: record.file.mime.to_string(),
                    data: base64::engine::general_purpose::STANDARD.encode(&record.file.data),
                },
            });
        }

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }

    /// Validate the reply against the declared schema and key it by
    /// identifier. Identifiers that were never requested are dropped.
    fn parse_response(
        &self,
        body: &str,
        requested: &HashSet<&str>,
    ) -> Result<HashMap<String, Analysis>, ClassifyError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ClassifyError::ResponseFormat(
                "model returned an empty body".to_string(),
            ));
        }

        let response: AnalysisResponse = serde_json::from_str(body)
            .map_err(|e| ClassifyError::ResponseFormat(format!("schema violation: {e}")))?;

        let mut results = HashMap::with_capacity(response.images.len());
        for entry in response.images {
            if !requested.contains(entry.id.as_str()) {
                tracing::warn!(id = %entry.id, "dropping analysis for an identifier that was never sent");
                continue;
            }
            if results.insert(entry.id.clone(), entry.analysis).is_some() {
                tracing::warn!(id = %entry.id, "duplicate identifier in response, keeping the last entry");
            }
        }
        Ok(results)
    }
}

#[async_trait]
impl Classifier for GeminiClient {
    async fn classify(
        &self,
        records: &[ImageRecord],
    ) -> Result<HashMap<String, Analysis>, ClassifyError> {
        if records.is_empty() {
            tracing::warn!("classify called with no records; skipping remote call");
            return Ok(HashMap::new());
        }
        if self.config.api_key.trim().is_empty() {
            return Err(ClassifyError::Authentication(
                "GEMINI_API_KEY is not configured".to_string(),
            ));
        }

        let request = self.build_request(records);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        tracing::info!(records = records.len(), model = %self.config.model, "sending classification request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ClassifyError::Service(format!("request failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClassifyError::Authentication(format!(
                "service rejected the credential ({status})"
            )));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Service(format!(
                "service error ({status}): {text}"
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::ResponseFormat(format!("unparsable envelope: {e}")))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| {
                ClassifyError::ResponseFormat("model returned no text".to_string())
            })?;

        let requested: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let results = self.parse_response(text, &requested)?;

        if results.len() < records.len() {
            tracing::warn!(
                requested = records.len(),
                returned = results.len(),
                "response omitted some requested identifiers"
            );
        }
        Ok(results)
    }
}

// API request/response types

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::types::Status;
    use crate::store::ImageStore;

    fn client() -> GeminiClient {
        GeminiClient::new(ClassifierConfig::default()).unwrap()
    }

    fn store_with(n: usize) -> ImageStore {
        let mut store = ImageStore::new();
        store.set_asset_name("Motor01");
        store.add((0..n).map(|i| vec![0xFF, 0xD8, 0xFF, i as u8]).collect());
        store
    }

    fn analysis_json(id: &str) -> String {
        format!(
            r#"{{"id": "{id}", "analysis": {{
                "temperatureFound": "85°C",
                "status": "ALERTA",
                "normCompliance": "MTA 90°C",
                "description": "Aquecimento em conexão",
                "recommendation": "Reapertar na próxima parada"
            }}}}"#
        )
    }

    #[test]
    fn request_interleaves_labels_and_payloads() {
        let store = store_with(2);
        let request = client().build_request(store.records());
        let json = serde_json::to_value(&request).unwrap();

        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 5);
        assert!(parts[0]["text"]
            .as_str()
            .unwrap()
            .contains("termografia industrial"));

        for (i, record) in store.records().iter().enumerate() {
            let label = &parts[1 + i * 2]["text"];
            assert_eq!(
                label.as_str().unwrap(),
                format!("Analisar Imagem ID: {}", record.id)
            );
            let inline = &parts[2 + i * 2]["inlineData"];
            assert_eq!(inline["mimeType"], "image/jpeg");
            assert!(!inline["data"].as_str().unwrap().is_empty());
        }

        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn parse_keys_results_by_requested_id() {
        let requested: HashSet<&str> = ["a", "b"].into_iter().collect();
        let body = format!(r#"{{"images": [{}, {}]}}"#, analysis_json("a"), analysis_json("b"));

        let results = client().parse_response(&body, &requested).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results["a"].status, Status::Alert);
    }

    #[test]
    fn parse_drops_identifiers_that_were_never_sent() {
        let requested: HashSet<&str> = ["a"].into_iter().collect();
        let body = format!(r#"{{"images": [{}, {}]}}"#, analysis_json("a"), analysis_json("ghost"));

        let results = client().parse_response(&body, &requested).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.contains_key("a"));
    }

    #[test]
    fn parse_rejects_empty_body() {
        let requested = HashSet::new();
        let err = client().parse_response("  ", &requested).unwrap_err();
        assert!(matches!(err, ClassifyError::ResponseFormat(_)));
    }

    #[test]
    fn parse_rejects_schema_violations() {
        let requested: HashSet<&str> = ["a"].into_iter().collect();
        let err = client()
            .parse_response(r#"{"images": [{"id": "a"}]}"#, &requested)
            .unwrap_err();
        assert!(matches!(err, ClassifyError::ResponseFormat(_)));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let store = store_with(1);
        let err = client().classify(store.records()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Authentication(_)));
    }

    #[tokio::test]
    async fn empty_record_set_skips_the_remote_call() {
        let results = client().classify(&[]).await.unwrap();
        assert!(results.is_empty());
    }
}
