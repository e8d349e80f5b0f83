//! Capability traits for the remote inference provider.
//!
//! [`InferenceGateway`] answers prompts; [`MediaStager`] holds uploaded image
//! bytes so requests can refer to them by URI instead of re-sending them.
//! Both are object-safe and `Send + Sync` so the pipeline can hold them as
//! `Arc<dyn …>` and tests can swap in fakes.

use async_trait::async_trait;
use thiserror::Error;

use crate::gateway::types::{MediaReference, StructuredReadout, StructuredRequest, TextRequest};

// ---------------------------------------------------------------------------
// GatewayError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the inference provider.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The provider answered with a non-success status code.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response could not be parsed into the expected shape.
    #[error("failed to parse provider response: {0}")]
    Parse(String),

    /// The response carried no usable content.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The caller cancelled the run while the call was in flight.
    #[error("call cancelled by caller")]
    Cancelled,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else {
            GatewayError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// InferenceGateway
// ---------------------------------------------------------------------------

/// Multimodal inference provider.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Run a structured-extraction request against a staged image and return
    /// the fields declared by [`StructuredReadout::response_schema`].
    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredReadout, GatewayError>;

    /// Run a text-only prompt and return the raw model text.
    async fn generate_text(&self, request: &TextRequest) -> Result<String, GatewayError>;
}

// ---------------------------------------------------------------------------
// MediaStager
// ---------------------------------------------------------------------------

/// Remote blob storage the inference provider can dereference.
#[async_trait]
pub trait MediaStager: Send + Sync {
    /// Upload `bytes` and return a handle usable in a [`StructuredRequest`].
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<MediaReference, GatewayError>;

    /// Delete a previously uploaded blob by its [`MediaReference::name`].
    async fn delete(&self, name: &str) -> Result<(), GatewayError>;
}

// Compile-time assertion: both traits must be usable as trait objects.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn InferenceGateway>, _: Box<dyn MediaStager>) {}
};
