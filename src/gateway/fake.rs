//! Test doubles for the gateway traits.
//!
//! Both fakes record every call so tests can assert on how often (and with
//! what) the pipeline reached the network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::gateway::client::{GatewayError, InferenceGateway, MediaStager};
use crate::gateway::types::{MediaReference, StructuredReadout, StructuredRequest, TextRequest};

// ---------------------------------------------------------------------------
// FakeGateway
// ---------------------------------------------------------------------------

/// Replays queued responses in order. An exhausted queue answers
/// [`GatewayError::EmptyResponse`].
#[derive(Default)]
pub struct FakeGateway {
    structured: Mutex<VecDeque<Result<StructuredReadout, GatewayError>>>,
    text: Mutex<VecDeque<Result<String, GatewayError>>>,
    pub structured_calls: Mutex<Vec<StructuredRequest>>,
    pub text_calls: Mutex<Vec<TextRequest>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful structured answer.
    pub fn with_readout(self, read: &str, date: &str) -> Self {
        self.structured.lock().unwrap().push_back(Ok(StructuredReadout {
            read: read.into(),
            date: date.into(),
        }));
        self
    }

    /// Queue a failing structured answer.
    pub fn with_structured_error(self, error: GatewayError) -> Self {
        self.structured.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue a successful text answer.
    pub fn with_text(self, text: &str) -> Self {
        self.text.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queue a failing text answer.
    pub fn with_text_error(self, error: GatewayError) -> Self {
        self.text.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn structured_call_count(&self) -> usize {
        self.structured_calls.lock().unwrap().len()
    }

    pub fn text_call_count(&self) -> usize {
        self.text_calls.lock().unwrap().len()
    }

    /// Messages of every text call, in order.
    pub fn text_messages(&self) -> Vec<String> {
        self.text_calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.message.clone())
            .collect()
    }
}

#[async_trait]
impl InferenceGateway for FakeGateway {
    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredReadout, GatewayError> {
        self.structured_calls.lock().unwrap().push(request.clone());
        self.structured
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyResponse))
    }

    async fn generate_text(&self, request: &TextRequest) -> Result<String, GatewayError> {
        self.text_calls.lock().unwrap().push(request.clone());
        self.text
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyResponse))
    }
}

// ---------------------------------------------------------------------------
// FakeStager
// ---------------------------------------------------------------------------

/// In-memory stager; hands out `files/fake-N` references.
#[derive(Default)]
pub struct FakeStager {
    fail_upload: bool,
    fail_delete: bool,
    pub uploads: Mutex<Vec<(usize, String, String)>>,
    pub deletes: Mutex<Vec<String>>,
}

impl FakeStager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_upload() -> Self {
        Self {
            fail_upload: true,
            ..Self::default()
        }
    }

    pub fn failing_delete() -> Self {
        Self {
            fail_delete: true,
            ..Self::default()
        }
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaStager for FakeStager {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        mime_type: &str,
        display_name: &str,
    ) -> Result<MediaReference, GatewayError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((bytes.len(), mime_type.to_string(), display_name.to_string()));
        if self.fail_upload {
            return Err(GatewayError::Request("storage unavailable".into()));
        }
        let name = format!("files/fake-{}", uploads.len());
        Ok(MediaReference {
            uri: format!("https://fake.test/{name}"),
            name,
            mime_type: mime_type.to_string(),
        })
    }

    async fn delete(&self, name: &str) -> Result<(), GatewayError> {
        self.deletes.lock().unwrap().push(name.to_string());
        if self.fail_delete {
            return Err(GatewayError::Status {
                status: 500,
                body: "delete failed".into(),
            });
        }
        Ok(())
    }
}
