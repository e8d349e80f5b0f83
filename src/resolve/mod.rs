//! Resolution of uncertain digits.
//!
//! This module provides:
//! * [`Disambiguator`]: validates an ambiguous reading and asks the model to
//!   fill in each `?`.
//! * [`build_resolution_prompt`]: the text prompt used for that call.
//! * Alphabet helpers ([`has_uncertain_digits`], [`first_invalid_char`],
//!   [`check_resolved_shape`]).
//! * [`ResolveError`]: error variants for the resolution step.

pub mod alphabet;
pub mod disambiguator;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use alphabet::{
    check_resolved_shape, first_invalid_char, has_uncertain_digits, ShapeMismatch,
    UNCERTAIN_DIGIT,
};
pub use disambiguator::{Disambiguator, ResolveError};
pub use prompt::build_resolution_prompt;
