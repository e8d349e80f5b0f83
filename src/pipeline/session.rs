//! Carry-over context between sequential extraction runs.

/// The last confirmed reading, used as a hint when resolving `?` digits in
/// the next run.
///
/// A session is passed to [`ReadingExtractor::extract`] by `&mut`, so one
/// session can only serve one run at a time. Give each concurrent caller its
/// own session.
///
/// [`ReadingExtractor::extract`]: crate::pipeline::ReadingExtractor::extract
///
/// ```rust
/// use gas_meter_reader::pipeline::Session;
///
/// let session = Session::with_last_reading("0123.4");
/// assert_eq!(session.last_reading(), "0123.4");
/// assert!(Session::new().last_reading().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    last_reading: String,
}

impl Session {
    /// Start with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the session with a reading confirmed elsewhere.
    pub fn with_last_reading(reading: impl Into<String>) -> Self {
        Self {
            last_reading: reading.into(),
        }
    }

    /// The most recent confirmed reading, or `""` before the first run.
    pub fn last_reading(&self) -> &str {
        &self.last_reading
    }

    /// Returns `true` once a reading has been recorded.
    pub fn has_history(&self) -> bool {
        !self.last_reading.is_empty()
    }

    /// Forget the last reading (e.g. after a meter swap).
    pub fn reset(&mut self) {
        self.last_reading.clear();
    }

    pub(crate) fn record(&mut self, reading: &str) {
        self.last_reading.clear();
        self.last_reading.push_str(reading);
    }
}
