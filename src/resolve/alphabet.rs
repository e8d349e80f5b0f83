//! Character-level checks on meter readings.
//!
//! A reading is a fixed-width string of digits and at most a few decimal
//! points. The vision model writes [`UNCERTAIN_DIGIT`] wherever a digit wheel
//! was unreadable.

/// Placeholder for a digit the vision model could not read.
pub const UNCERTAIN_DIGIT: char = '?';

/// Returns `true` when `reading` still contains at least one `?`.
pub fn has_uncertain_digits(reading: &str) -> bool {
    reading.contains(UNCERTAIN_DIGIT)
}

/// Characters allowed in an ambiguous reading: `.`, `0`–`9`, `?`.
fn is_ambiguous_char(c: char) -> bool {
    c == '.' || c == UNCERTAIN_DIGIT || c.is_ascii_digit()
}

/// Characters allowed in a resolved reading: `.`, `0`–`9`.
fn is_resolved_char(c: char) -> bool {
    c == '.' || c.is_ascii_digit()
}

/// Return the first character of `reading` outside `{'.', '0'..='9', '?'}`.
pub fn first_invalid_char(reading: &str) -> Option<char> {
    reading.chars().find(|c| !is_ambiguous_char(*c))
}

/// Why a resolved reading does not fit the ambiguous one it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeMismatch {
    /// Character count differs.
    Length { expected: usize, actual: usize },
    /// A character outside `{'.', '0'..='9'}` (including a leftover `?`).
    Character(char),
    /// A digit or decimal point that was readable has been changed.
    ChangedFixedChar { position: usize, expected: char, actual: char },
}

impl std::fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeMismatch::Length { expected, actual } => {
                write!(f, "expected {expected} characters, got {actual}")
            }
            ShapeMismatch::Character(c) => write!(f, "unexpected character {c:?}"),
            ShapeMismatch::ChangedFixedChar {
                position,
                expected,
                actual,
            } => write!(
                f,
                "character {position} changed from {expected:?} to {actual:?}"
            ),
        }
    }
}

/// Check that `resolved` is `ambiguous` with every `?` filled by a digit.
pub fn check_resolved_shape(ambiguous: &str, resolved: &str) -> Result<(), ShapeMismatch> {
    if let Some(c) = resolved.chars().find(|c| !is_resolved_char(*c)) {
        return Err(ShapeMismatch::Character(c));
    }

    let expected = ambiguous.chars().count();
    let actual = resolved.chars().count();
    if expected != actual {
        return Err(ShapeMismatch::Length { expected, actual });
    }

    for (position, (a, r)) in ambiguous.chars().zip(resolved.chars()).enumerate() {
        if a != UNCERTAIN_DIGIT && a != r {
            return Err(ShapeMismatch::ChangedFixedChar {
                position,
                expected: a,
                actual: r,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markers() {
        assert!(has_uncertain_digits("12?.5"));
        assert!(!has_uncertain_digits("128.5"));
        assert!(!has_uncertain_digits(""));
    }

    #[test]
    fn accepts_digits_points_and_markers() {
        assert_eq!(first_invalid_char("0123.4?"), None);
        assert_eq!(first_invalid_char("????"), None);
        assert_eq!(first_invalid_char(""), None);
    }

    #[test]
    fn rejects_letters_spaces_and_signs() {
        assert_eq!(first_invalid_char("12a.5"), Some('a'));
        assert_eq!(first_invalid_char("12 3"), Some(' '));
        assert_eq!(first_invalid_char("-12"), Some('-'));
        assert_eq!(first_invalid_char("1,2"), Some(','));
    }

    #[test]
    fn rejects_non_ascii_digits() {
        // Arabic-Indic three.
        assert_eq!(first_invalid_char("1\u{0663}"), Some('\u{0663}'));
    }

    #[test]
    fn resolved_shape_matches() {
        assert_eq!(check_resolved_shape("12?.5", "128.5"), Ok(()));
        assert_eq!(check_resolved_shape("??", "07"), Ok(()));
    }

    #[test]
    fn resolved_shape_length_mismatch() {
        assert_eq!(
            check_resolved_shape("12?.5", "1280.5"),
            Err(ShapeMismatch::Length {
                expected: 5,
                actual: 6
            })
        );
    }

    #[test]
    fn resolved_shape_rejects_leftover_marker_and_prose() {
        assert_eq!(
            check_resolved_shape("12?.5", "12?.5"),
            Err(ShapeMismatch::Character('?'))
        );
        assert_eq!(
            check_resolved_shape("12?.5", "It is 128.5"),
            Err(ShapeMismatch::Character('I'))
        );
    }

    #[test]
    fn resolved_shape_rejects_changed_known_digit() {
        assert_eq!(
            check_resolved_shape("12?.5", "138.5"),
            Err(ShapeMismatch::ChangedFixedChar {
                position: 1,
                expected: '2',
                actual: '3'
            })
        );
    }
}
