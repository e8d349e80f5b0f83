//! Inference provider boundary for the gas-meter reader.
//!
//! This module provides:
//! * [`InferenceGateway`]: structured and text-only generation.
//! * [`MediaStager`]: upload / delete of image blobs.
//! * [`GeminiClient`]: REST implementation of both traits.
//! * [`GatewayError`]: transport-level error variants.
//! * [`cancellable`]: races a remote call against the caller's
//!   [`CancellationToken`].

pub mod client;
pub mod gemini;
pub mod types;

#[cfg(test)]
pub mod fake;

use std::future::Future;

use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{GatewayError, InferenceGateway, MediaStager};
pub use gemini::GeminiClient;
pub use types::{MediaReference, StructuredReadout, StructuredRequest, TextRequest};

/// Await `call`, aborting with [`GatewayError::Cancelled`] as soon as
/// `cancel` fires.
///
/// `call` is always polled before the token is checked, so a call that is
/// ready immediately still completes even on an already-cancelled token.
pub async fn cancellable<T, F>(cancel: &CancellationToken, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    tokio::select! {
        biased;
        result = call => result,
        _ = cancel.cancelled() => Err(GatewayError::Cancelled),
    }
}
