//! Request and response shapes exchanged with the inference provider.

use serde::{Deserialize, Serialize};

use crate::config::SamplingConfig;

// ---------------------------------------------------------------------------
// MediaReference
// ---------------------------------------------------------------------------

/// Handle to an uploaded blob.
///
/// `name` identifies the blob for deletion; `uri` is what the provider
/// dereferences when the blob is attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    pub name: String,
    pub uri: String,
    pub mime_type: String,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A multimodal request whose answer must conform to
/// [`StructuredReadout::response_schema`].
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// Domain framing sent as the system message.
    pub system_instruction: String,
    /// The staged image.
    pub media: MediaReference,
    /// Task description sent alongside the image in the user message.
    pub user_instruction: String,
    pub sampling: SamplingConfig,
}

/// A plain single-message text prompt.
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub message: String,
    pub sampling: SamplingConfig,
}

// ---------------------------------------------------------------------------
// StructuredReadout
// ---------------------------------------------------------------------------

/// Fields the vision model returns for a meter photograph.
///
/// `read` may contain `?` in place of digits the model could not make out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReadout {
    pub read: String,
    #[serde(default)]
    pub date: String,
}

impl StructuredReadout {
    /// JSON schema (provider dialect) constraining the structured answer.
    pub fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "read": { "type": "STRING" },
                "date": { "type": "STRING" }
            },
            "required": ["read", "date"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_parses_from_model_json() {
        let json = r#"{"read":"0123.4?","date":"2024-01-01"}"#;
        let readout: StructuredReadout = serde_json::from_str(json).unwrap();
        assert_eq!(readout.read, "0123.4?");
        assert_eq!(readout.date, "2024-01-01");
    }

    #[test]
    fn readout_tolerates_missing_date() {
        let readout: StructuredReadout = serde_json::from_str(r#"{"read":"42.0"}"#).unwrap();
        assert_eq!(readout.read, "42.0");
        assert!(readout.date.is_empty());
    }

    #[test]
    fn schema_requires_both_fields() {
        let schema = StructuredReadout::response_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "read"));
        assert!(required.iter().any(|v| v == "date"));
    }
}
