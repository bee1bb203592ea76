// Canonical request/response types.
//
// These are the types every stage operates on: the relay handlers
// deserialize `MedicalQuery` from the inbound body, the consent gate
// reads it, and the upstream client serializes it back out. The wire
// format is camelCase on both sides regardless of internal naming.

use serde::{Deserialize, Serialize};

/// A single medical query, owned by exactly one in-flight request.
///
/// Missing fields deserialize to their defaults, so a request that omits
/// `consentProvided` is treated as consent withheld and rejected by the
/// consent gate rather than by the JSON layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalQuery {
    pub patient_id: String,
    /// Free-text symptom description. Must be non-blank to pass the gate.
    pub symptoms: String,
    /// Intended range is 1-5. Never validated; forwarded as received.
    pub urgency_level: i32,
    /// Explicit patient consent. Nothing leaves the process without it.
    pub consent_provided: bool,
}

/// The fully materialized result of a buffered analysis request.
///
/// Deserialization is strict: an upstream body missing any of these
/// fields is an upstream decode failure, not a half-filled result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analysis_text: String,
    pub recommended_actions: Vec<String>,
    pub agent_in_charge: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_wire_format_is_camel_case() {
        let query = MedicalQuery {
            patient_id: "PAT-001".to_string(),
            symptoms: "persistent cough".to_string(),
            urgency_level: 3,
            consent_provided: true,
        };

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["patientId"], "PAT-001");
        assert_eq!(json["symptoms"], "persistent cough");
        assert_eq!(json["urgencyLevel"], 3);
        assert_eq!(json["consentProvided"], true);
    }

    #[test]
    fn missing_fields_default_to_consent_withheld() {
        let query: MedicalQuery = serde_json::from_str(r#"{"symptoms":"fever"}"#).unwrap();
        assert!(!query.consent_provided);
        assert_eq!(query.urgency_level, 0);
        assert!(query.patient_id.is_empty());
    }

    #[test]
    fn result_missing_field_fails_to_deserialize() {
        let err = serde_json::from_str::<AnalysisResult>(r#"{"analysisText":"ok"}"#);
        assert!(err.is_err());
    }
}
