//! Reading extractor, which drives the stage → extract → (resolve) → finalize run.
//!
//! # Pipeline flow
//!
//! ```text
//! extract(image, session)
//!   └─▶ StagedMedia::stage                         [Staging]
//!         └─▶ gateway.generate_structured          [Extracting]
//!               ├─ no "?"  ─────────────────────────────────▶ [Finalizing]
//!               └─ has "?" → disambiguator.resolve [Resolving] ▶ [Finalizing]
//!         └─▶ StagedMedia::release (every path after staging)
//!   └─▶ session.record(reading)                    [Done]
//! ```
//!
//! Every remote call races the caller's [`CancellationToken`]. The run is a
//! straight sequence of awaits with no internal retries.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{AppConfig, PromptConfig, SamplingConfig};
use crate::gateway::{
    cancellable, GatewayError, InferenceGateway, MediaReference, MediaStager, StructuredReadout,
    StructuredRequest,
};
use crate::resolve::{has_uncertain_digits, Disambiguator, ResolveError};

use super::result::{format_elapsed, ReadingResult};
use super::session::Session;
use super::staged::StagedMedia;
use super::state::{PipelineStage, StageTracker};

/// Mime type of every uploaded photograph.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
/// Display name attached to uploaded photographs.
pub const IMAGE_DISPLAY_NAME: &str = "Gas Meter Image";

// ---------------------------------------------------------------------------
// ExtractError
// ---------------------------------------------------------------------------

/// Errors that end an extraction run. Each variant names the failing stage.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Uploading the image failed.
    #[error("failed to upload meter image: {0}")]
    StagingFailed(GatewayError),

    /// The structured extraction call failed.
    #[error("failed to analyze meter image: {0}")]
    InferenceFailed(GatewayError),

    /// The reading had `?` digits and resolving them failed.
    #[error("failed to resolve ambiguous digits: {0}")]
    DisambiguationFailed(ResolveError),
}

impl ExtractError {
    /// The stage the run was in when it failed.
    pub fn stage(&self) -> PipelineStage {
        match self {
            ExtractError::StagingFailed(_) => PipelineStage::Staging,
            ExtractError::InferenceFailed(_) => PipelineStage::Extracting,
            ExtractError::DisambiguationFailed(_) => PipelineStage::Resolving,
        }
    }

    /// Returns `true` when the run ended because the caller cancelled it.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ExtractError::StagingFailed(GatewayError::Cancelled)
                | ExtractError::InferenceFailed(GatewayError::Cancelled)
                | ExtractError::DisambiguationFailed(ResolveError::Inference(
                    GatewayError::Cancelled
                ))
        )
    }
}

// ---------------------------------------------------------------------------
// ReadingExtractor
// ---------------------------------------------------------------------------

/// Turns a meter photograph into a [`ReadingResult`].
///
/// The extractor holds no per-run state and is `Send + Sync`; history lives
/// in the [`Session`] each caller passes in.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use gas_meter_reader::config::AppConfig;
/// use gas_meter_reader::gateway::GeminiClient;
/// use gas_meter_reader::pipeline::{ReadingExtractor, Session};
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let client = Arc::new(GeminiClient::from_config(&config.gateway));
/// let extractor = ReadingExtractor::new(client.clone(), client, &config);
///
/// let mut session = Session::new();
/// let image = std::fs::read("meter.jpg").unwrap();
/// let result = extractor
///     .extract(image, &mut session, &CancellationToken::new())
///     .await
///     .unwrap();
/// println!("{} ({})", result.reading, result.elapsed);
/// # }
/// ```
pub struct ReadingExtractor {
    gateway: Arc<dyn InferenceGateway>,
    stager: Arc<dyn MediaStager>,
    disambiguator: Disambiguator,
    prompts: PromptConfig,
    sampling: SamplingConfig,
}

impl ReadingExtractor {
    /// Create an extractor.
    ///
    /// # Arguments
    ///
    /// * `gateway`: inference provider for both extraction and resolution.
    /// * `stager` : blob storage the provider can read images from.
    /// * `config` : prompts, sampling policy and resolution settings.
    pub fn new(
        gateway: Arc<dyn InferenceGateway>,
        stager: Arc<dyn MediaStager>,
        config: &AppConfig,
    ) -> Self {
        let disambiguator =
            Disambiguator::new(Arc::clone(&gateway), config.sampling, &config.resolve);

        Self {
            gateway,
            stager,
            disambiguator,
            prompts: config.prompts.clone(),
            sampling: config.sampling,
        }
    }

    /// Read the meter in `image` (JPEG bytes).
    ///
    /// On success the reading contains no `?` and `session` holds it as the
    /// hint for the next run. On failure `session` is left untouched. The
    /// uploaded image is deleted on every path once staging has succeeded.
    pub async fn extract(
        &self,
        image: Vec<u8>,
        session: &mut Session,
        cancel: &CancellationToken,
    ) -> Result<ReadingResult, ExtractError> {
        let start = Instant::now();
        let mut stage = StageTracker::new();

        // ── 1. Stage the image ───────────────────────────────────────────
        stage.advance(PipelineStage::Staging);
        let staged = match StagedMedia::stage(
            Arc::clone(&self.stager),
            image,
            IMAGE_MIME_TYPE,
            IMAGE_DISPLAY_NAME,
            cancel,
        )
        .await
        {
            Ok(staged) => staged,
            Err(e) => {
                log::error!("pipeline error during {}: {e}", stage.current());
                stage.fail();
                return Err(ExtractError::StagingFailed(e));
            }
        };

        // ── 2. Extract (and resolve) ─────────────────────────────────────
        let outcome = self
            .read_staged(staged.reference(), session.last_reading(), &mut stage, cancel)
            .await
            .map(|readout| {
                stage.advance(PipelineStage::Finalizing);
                ReadingResult {
                    reading: readout.read,
                    date: readout.date,
                    read_at: Utc::now(),
                    elapsed: format_elapsed(start.elapsed()),
                }
            });

        // ── 3. Dispose of the upload on every path ───────────────────────
        staged.release(cancel).await;

        // ── 4. Finalise ──────────────────────────────────────────────────
        match outcome {
            Ok(result) => {
                session.record(&result.reading);
                stage.advance(PipelineStage::Done);
                Ok(result)
            }
            Err(e) => {
                log::error!("pipeline error during {}: {e}", stage.current());
                stage.fail();
                Err(e)
            }
        }
    }

    async fn read_staged(
        &self,
        media: &MediaReference,
        prior: &str,
        stage: &mut StageTracker,
        cancel: &CancellationToken,
    ) -> Result<StructuredReadout, ExtractError> {
        stage.advance(PipelineStage::Extracting);

        let request = StructuredRequest {
            system_instruction: self.prompts.system_prompt.clone(),
            media: media.clone(),
            user_instruction: self.prompts.image_prompt.clone(),
            sampling: self.sampling,
        };

        let mut readout = cancellable(cancel, self.gateway.generate_structured(&request))
            .await
            .map_err(ExtractError::InferenceFailed)?;

        if has_uncertain_digits(&readout.read) {
            log::warn!("ambiguous digits found in the reading: {}", readout.read);
            stage.advance(PipelineStage::Resolving);
            readout.read = self
                .disambiguator
                .resolve(&readout.read, prior, cancel)
                .await
                .map_err(ExtractError::DisambiguationFailed)?;
        }

        Ok(readout)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
