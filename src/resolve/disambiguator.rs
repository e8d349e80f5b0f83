//! [`Disambiguator`]: fills in `?` digits with a text-only inference call.
//!
//! The ambiguous reading is checked against the reading alphabet *before*
//! any request is made, so a drifting structured answer never reaches the
//! provider a second time.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{ResolveConfig, SamplingConfig};
use crate::gateway::{cancellable, GatewayError, InferenceGateway, TextRequest};
use crate::resolve::alphabet::{
    check_resolved_shape, first_invalid_char, has_uncertain_digits, ShapeMismatch,
    UNCERTAIN_DIGIT,
};
use crate::resolve::prompt::build_resolution_prompt;

// ---------------------------------------------------------------------------
// ResolveError
// ---------------------------------------------------------------------------

/// Errors raised while resolving uncertain digits.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The ambiguous reading contains a character outside `.`, `0`–`9`, `?`.
    #[error("ambiguous reading {value:?} contains disallowed character {offending:?}")]
    InvalidInput { value: String, offending: char },

    /// The text-only call failed.
    #[error("resolution call failed: {0}")]
    Inference(GatewayError),

    /// The model's answer does not fit the ambiguous reading.
    #[error("resolved reading {output:?} rejected: {reason}")]
    MalformedOutput {
        output: String,
        reason: ShapeMismatch,
    },
}

// ---------------------------------------------------------------------------
// Disambiguator
// ---------------------------------------------------------------------------

/// Resolves `?` digits using the previous confirmed reading as a hint.
pub struct Disambiguator {
    gateway: Arc<dyn InferenceGateway>,
    sampling: SamplingConfig,
    strict_output: bool,
}

impl Disambiguator {
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        sampling: SamplingConfig,
        config: &ResolveConfig,
    ) -> Self {
        Self {
            gateway,
            sampling,
            strict_output: config.strict_output,
        }
    }

    /// Replace every `?` in `ambiguous` with the model's best digit guess.
    ///
    /// `prior` is advisory; an empty string means no history is available.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidInput`]: `ambiguous` has a disallowed
    ///   character; no request was made.
    /// - [`ResolveError::Inference`]: the call failed or was cancelled.
    /// - [`ResolveError::MalformedOutput`]: the answer still contains `?`,
    ///   or (with `strict_output`) its length, alphabet or fixed digits
    ///   differ from `ambiguous`.
    pub async fn resolve(
        &self,
        ambiguous: &str,
        prior: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ResolveError> {
        if let Some(offending) = first_invalid_char(ambiguous) {
            return Err(ResolveError::InvalidInput {
                value: ambiguous.to_string(),
                offending,
            });
        }

        let request = TextRequest {
            message: build_resolution_prompt(ambiguous, prior),
            sampling: self.sampling,
        };

        let raw = cancellable(cancel, self.gateway.generate_text(&request))
            .await
            .map_err(ResolveError::Inference)?;
        let resolved = raw.trim().to_string();

        if self.strict_output {
            if let Err(reason) = check_resolved_shape(ambiguous, &resolved) {
                return Err(ResolveError::MalformedOutput {
                    output: resolved,
                    reason,
                });
            }
        } else if has_uncertain_digits(&resolved) {
            return Err(ResolveError::MalformedOutput {
                output: resolved,
                reason: ShapeMismatch::Character(UNCERTAIN_DIGIT),
            });
        }

        log::debug!("resolve: {ambiguous:?} → {resolved:?} (prior {prior:?})");
        Ok(resolved)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
