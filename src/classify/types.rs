//! Wire types for the classification exchange.
//!
//! The response contract is a strict external schema validated on
//! receipt: every field is mandatory, `status` is a closed set, and
//! unknown fields are rejected.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Severity of a hotspot against the admissible-temperature norm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ALERTA")]
    Alert,
    #[serde(rename = "CRÍTICO")]
    Critical,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Alert => "ALERTA",
            Self::Critical => "CRÍTICO",
        }
    }
}

/// Classification result attached to one image record.
///
/// Immutable once attached; a later successful run replaces it whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Analysis {
    /// Free-text magnitude as reported by the classifier.
    pub temperature_found: String,
    pub status: Status,
    /// Which tolerance threshold applies, as stated by the classifier.
    pub norm_compliance: String,
    pub description: String,
    pub recommendation: String,
}

/// Declared response envelope: `{ "images": [{ "id", "analysis" }] }`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResponse {
    pub images: Vec<AnalysisEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisEntry {
    pub id: String,
    pub analysis: Analysis,
}

/// Response schema declared to the service for constrained JSON output.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "images": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "analysis": {
                            "type": "OBJECT",
                            "properties": {
                                "temperatureFound": { "type": "STRING" },
                                "status": {
                                    "type": "STRING",
                                    "enum": ["OK", "ALERTA", "CRÍTICO"]
                                },
                                "normCompliance": { "type": "STRING" },
                                "description": { "type": "STRING" },
                                "recommendation": { "type": "STRING" }
                            },
                            "required": [
                                "temperatureFound",
                                "status",
                                "normCompliance",
                                "description",
                                "recommendation"
                            ]
                        }
                    },
                    "required": ["id", "analysis"]
                }
            }
        },
        "required": ["images"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_round_trips_wire_spellings() {
        let json = r#"{
            "temperatureFound": "92°C",
            "status": "CRÍTICO",
            "normCompliance": "MTA 90°C (barramentos de baixa tensão)",
            "description": "Aquecimento no barramento",
            "recommendation": "Desenergizar e reapertar conexões"
        }"#;

        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.status, Status::Critical);

        let back = serde_json::to_value(&analysis).unwrap();
        assert_eq!(back["status"], "CRÍTICO");
    }

    #[test]
    fn status_outside_the_closed_set_is_rejected() {
        let json = r#"{
            "temperatureFound": "40°C",
            "status": "WARNING",
            "normCompliance": "n/a",
            "description": "d",
            "recommendation": "r"
        }"#;
        assert!(serde_json::from_str::<Analysis>(json).is_err());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let json = r#"{"images": [{"id": "abc", "analysis": {"status": "OK"}}]}"#;
        assert!(serde_json::from_str::<AnalysisResponse>(json).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{"images": [], "extra": true}"#;
        assert!(serde_json::from_str::<AnalysisResponse>(json).is_err());
    }

    #[test]
    fn schema_requires_all_analysis_fields() {
        let schema = response_schema();
        let required = &schema["properties"]["images"]["items"]["properties"]["analysis"]["required"];
        let required: Vec<&str> = required
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            [
                "temperatureFound",
                "status",
                "normCompliance",
                "description",
                "recommendation"
            ]
        );
    }
}
