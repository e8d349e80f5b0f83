//! Gas-meter reader.
//!
//! Reads an analog gas-meter photograph with a multimodal model and fills in
//! any digits the model marked as unreadable (`?`) with a second, text-only
//! pass seeded with the previous confirmed reading.
//!
//! * [`config`]: `settings.toml` persistence and defaults.
//! * [`gateway`]: provider traits and the Gemini REST client.
//! * [`resolve`]: uncertain-digit validation and resolution.
//! * [`pipeline`]: the extraction run and its session state.

pub mod config;
pub mod gateway;
pub mod pipeline;
pub mod resolve;
