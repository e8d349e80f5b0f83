//! Per-run stage machine of the reading pipeline.
//!
//! [`PipelineStage`] names where a run is; [`StageTracker`] walks one run
//! through the legal transitions and logs each step.

// ---------------------------------------------------------------------------
// PipelineStage
// ---------------------------------------------------------------------------

/// Stages of a single extraction run.
///
/// The transitions are:
///
/// ```text
/// Idle ──▶ Staging ──▶ Extracting ──marker──▶ Resolving ──▶ Finalizing ──▶ Done
///                         └──no marker──────────────────────▶ Finalizing
/// Staging / Extracting / Resolving ──error──▶ Failed ──▶ Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Nothing started yet.
    Idle,

    /// The image bytes are being uploaded to the stager.
    Staging,

    /// The structured multimodal request is in flight.
    Extracting,

    /// The reading contained `?`; the text-only resolution call is in flight.
    Resolving,

    /// Timing and session state are being stamped.
    Finalizing,

    /// One of the remote stages failed; the run ends with an error.
    Failed,

    /// The run is over, with a result or an error.
    Done,
}

impl PipelineStage {
    /// A short human-readable label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "Idle",
            PipelineStage::Staging => "Staging",
            PipelineStage::Extracting => "Extracting",
            PipelineStage::Resolving => "Resolving",
            PipelineStage::Finalizing => "Finalizing",
            PipelineStage::Failed => "Failed",
            PipelineStage::Done => "Done",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: PipelineStage) -> bool {
        use PipelineStage::*;
        matches!(
            (self, next),
            (Idle, Staging)
                | (Staging, Extracting)
                | (Staging, Failed)
                | (Extracting, Resolving)
                | (Extracting, Finalizing)
                | (Extracting, Failed)
                | (Resolving, Finalizing)
                | (Resolving, Failed)
                | (Finalizing, Done)
                | (Failed, Done)
        )
    }
}

impl Default for PipelineStage {
    fn default() -> Self {
        PipelineStage::Idle
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StageTracker
// ---------------------------------------------------------------------------

/// Tracks the stage of one run.
#[derive(Debug, Default)]
pub struct StageTracker {
    current: PipelineStage,
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PipelineStage {
        self.current
    }

    /// Move to `next`, logging the transition.
    pub fn advance(&mut self, next: PipelineStage) {
        debug_assert!(
            self.current.can_advance_to(next),
            "illegal pipeline transition {} → {}",
            self.current,
            next
        );
        log::debug!("pipeline: {} → {}", self.current, next);
        self.current = next;
    }

    /// Short-circuit the run: `Failed` then `Done`.
    pub fn fail(&mut self) {
        self.advance(PipelineStage::Failed);
        self.advance(PipelineStage::Done);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
