//! The outcome of one successful extraction run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A final meter reading.
///
/// Serialized with the field names `read`, `date`, `read_at`, `it_takes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingResult {
    /// Digits and decimal point as shown on the meter; never contains `?`.
    #[serde(rename = "read")]
    pub reading: String,

    /// Date text reported by the vision model, unvalidated.
    pub date: String,

    /// When the answer became final (after any resolution).
    pub read_at: DateTime<Utc>,

    /// Wall-clock time of the whole run, e.g. `"1.203s"`.
    #[serde(rename = "it_takes")]
    pub elapsed: String,
}

/// Render `elapsed` with its natural unit (`"850ms"`, `"1.2034s"`).
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{elapsed:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_unit() {
        assert_eq!(format_elapsed(Duration::from_millis(850)), "850ms");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5s");
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let result = ReadingResult {
            reading: "128.5".into(),
            date: "2024-01-01".into(),
            read_at: Utc::now(),
            elapsed: "1.5s".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["read"], "128.5");
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["it_takes"], "1.5s");
        assert!(json["read_at"].is_string());
        assert!(json.get("reading").is_none());
    }
}
