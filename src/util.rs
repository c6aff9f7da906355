//! Small helpers for validating console input.

use crate::domain::MAX_ITEM_SCORE;
use crate::error::{Result, RetestError};

/// True if unicode char belongs to CJK ranges.
pub fn is_cjk(ch: char) -> bool {
  (ch >= '\u{4E00}' && ch <= '\u{9FFF}')
    || (ch >= '\u{3400}' && ch <= '\u{4DBF}')
    || (ch >= '\u{20000}' && ch <= '\u{2A6DF}')
    || (ch >= '\u{2A700}' && ch <= '\u{2B73F}')
    || (ch >= '\u{2B740}' && ch <= '\u{2B81F}')
    || (ch >= '\u{2B820}' && ch <= '\u{2CEAF}')
    || (ch >= '\u{F900}' && ch <= '\u{FAFF}')
}

/// Drop every space the user typed, as ids and names never contain one.
pub fn strip_spaces(s: &str) -> String {
  s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Non-empty, ASCII letters and digits only.
pub fn is_valid_student_id(id: &str) -> bool {
  !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Non-empty and either all Han characters or all ASCII letters; no mixing.
pub fn is_valid_student_name(name: &str) -> bool {
  !name.is_empty() && (name.chars().all(is_cjk) || name.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Parse a typed score. Accepts decimals in `[0, 10]`.
pub fn parse_score(raw: &str) -> Result<f64> {
  let invalid = || RetestError::InvalidScore { input: raw.to_string() };
  let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
  if !value.is_finite() || !(0.0..=MAX_ITEM_SCORE).contains(&value) {
    return Err(invalid());
  }
  Ok(value)
}
