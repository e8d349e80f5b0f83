//! Reading pipeline for the gas-meter reader.
//!
//! This module wires the image → stage → extract → resolve → finalize run and
//! exposes the carry-over [`Session`] between runs.
//!
//! # Architecture
//!
//! ```text
//! image bytes
//!        │
//!        ▼
//! ReadingExtractor::extract(image, &mut Session, &CancellationToken)
//!        │
//!        ├─ StagedMedia::stage          → MediaStager::upload
//!        ├─ generate_structured         → { read, date }
//!        ├─ [read has "?"] Disambiguator::resolve(read, session.last_reading)
//!        ├─ StagedMedia::release        → MediaStager::delete (best-effort)
//!        └─ session.record(reading)     → hint for the next run
//! ```

pub mod extractor;
pub mod result;
pub mod session;
pub mod staged;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use extractor::{ExtractError, ReadingExtractor, IMAGE_DISPLAY_NAME, IMAGE_MIME_TYPE};
pub use result::{format_elapsed, ReadingResult};
pub use session::Session;
pub use staged::StagedMedia;
pub use state::{PipelineStage, StageTracker};
