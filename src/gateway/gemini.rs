//! `GeminiClient`: Gemini REST implementation of [`InferenceGateway`] and
//! [`MediaStager`].
//!
//! Images go through the Files API (resumable upload, then referenced by URI
//! in `generateContent`). All connection details come from
//! [`GatewayConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::gateway::client::{GatewayError, InferenceGateway, MediaStager};
use crate::gateway::types::{MediaReference, StructuredReadout, StructuredRequest, TextRequest};

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Talks to `generativelanguage.googleapis.com` (or any compatible base URL).
pub struct GeminiClient {
    client: reqwest::Client,
    config: GatewayConfig,
    api_key: String,
}

impl GeminiClient {
    /// Build a client from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is used if the builder fails.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key: config.resolved_api_key().unwrap_or_default(),
        }
    }

    /// Attach the API key header only when a key is configured.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            req
        } else {
            req.header("x-goog-api-key", &self.api_key)
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn generate(&self, body: &Value) -> Result<String, GatewayError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url(),
            self.config.model
        );

        let response = self.authorize(self.client.post(&url).json(body)).send().await?;
        let response = ensure_success(response).await?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        candidate_text(&json)
    }
}

#[async_trait]
impl InferenceGateway for GeminiClient {
    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredReadout, GatewayError> {
        let text = self.generate(&structured_body(request)).await?;
        serde_json::from_str(text.trim()).map_err(|e| GatewayError::Parse(e.to_string()))
    }

    async fn generate_text(&self, request: &TextRequest) -> Result<String, GatewayError> {
        self.generate(&text_body(request)).await
    }
}

#[async_trait]
impl MediaStager for GeminiClient {
    /// Resumable upload: a `start` call negotiates an upload URL, then the
    /// bytes are sent with `upload, finalize`.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<MediaReference, GatewayError> {
        let start_url = format!("{}/upload/v1beta/files", self.base_url());

        let start = self
            .authorize(self.client.post(&start_url))
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", bytes.len().to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&serde_json::json!({ "file": { "display_name": display_name } }))
            .send()
            .await?;
        let start = ensure_success(start).await?;

        let upload_url = start
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| GatewayError::Parse("upload URL header missing".into()))?
            .to_string();

        let finish = self
            .client
            .post(&upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes)
            .send()
            .await?;
        let finish = ensure_success(finish).await?;

        let json: Value = finish
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        parse_uploaded_file(&json, mime_type)
    }

    async fn delete(&self, name: &str) -> Result<(), GatewayError> {
        let url = format!("{}/v1beta/{}", self.base_url(), name);
        let response = self.authorize(self.client.delete(&url)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire helpers
// ---------------------------------------------------------------------------

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        status: status.as_u16(),
        body,
    })
}

fn generation_config(sampling: &crate::config::SamplingConfig) -> Value {
    serde_json::json!({
        "temperature": sampling.temperature,
        "topK": sampling.top_k,
    })
}

fn structured_body(request: &StructuredRequest) -> Value {
    let mut config = generation_config(&request.sampling);
    config["responseMimeType"] = Value::from("application/json");
    config["responseSchema"] = StructuredReadout::response_schema();

    serde_json::json!({
        "systemInstruction": {
            "parts": [ { "text": request.system_instruction } ]
        },
        "contents": [{
            "role": "user",
            "parts": [
                {
                    "fileData": {
                        "mimeType": request.media.mime_type,
                        "fileUri":  request.media.uri
                    }
                },
                { "text": request.user_instruction }
            ]
        }],
        "generationConfig": config
    })
}

fn text_body(request: &TextRequest) -> Value {
    serde_json::json!({
        "contents": [{
            "role": "user",
            "parts": [ { "text": request.message } ]
        }],
        "generationConfig": generation_config(&request.sampling)
    })
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(json: &Value) -> Result<String, GatewayError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(GatewayError::EmptyResponse)?;

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text)
}

fn parse_uploaded_file(json: &Value, mime_type: &str) -> Result<MediaReference, GatewayError> {
    let file = &json["file"];
    let name = file["name"]
        .as_str()
        .ok_or_else(|| GatewayError::Parse("uploaded file has no name".into()))?;
    let uri = file["uri"]
        .as_str()
        .ok_or_else(|| GatewayError::Parse("uploaded file has no uri".into()))?;
    let mime_type = file["mimeType"].as_str().unwrap_or(mime_type);

    Ok(MediaReference {
        name: name.to_string(),
        uri: uri.to_string(),
        mime_type: mime_type.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
