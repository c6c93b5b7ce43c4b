//! size literal normalization
//!
//! converts human-readable byte counts ("10MB", "1KB", "512") into exact
//! byte values. units are binary: B=1, KB=1024, MB=1024^2, GB=1024^3.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// a run of digits followed by an alphabetic unit suffix
    static ref SIZE_RE: Regex = Regex::new(r"^(\d+)([A-Za-z]+)$").unwrap();
}

/// error type for unparseable size literals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeError {
    pub input: String,
}

impl SizeError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

impl std::fmt::Display for SizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid size literal: '{}'", self.input)
    }
}

impl std::error::Error for SizeError {}

/// parse a size literal into a byte count
///
/// accepts `<digits><unit>` with a case-insensitive binary unit (B, KB, MB,
/// GB), or a plain integer byte count. an unrecognized alphabetic suffix
/// (e.g. "10XB") reduces to the numeric value alone - deliberate leniency so
/// a typo in the unit degrades to bytes instead of dropping the rule.
pub fn parse_size(text: &str) -> Result<u64, SizeError> {
    if let Some(caps) = SIZE_RE.captures(text) {
        let value: u64 = caps[1].parse().map_err(|_| SizeError::new(text))?;
        let multiplier = unit_multiplier(&caps[2]);
        return value
            .checked_mul(multiplier)
            .ok_or_else(|| SizeError::new(text));
    }

    // no unit suffix: the whole text must be a plain integer
    text.parse::<u64>().map_err(|_| SizeError::new(text))
}

fn unit_multiplier(unit: &str) -> u64 {
    match unit.to_uppercase().as_str() {
        "B" => 1,
        "KB" => 1024,
        "MB" => 1024 * 1024,
        "GB" => 1024 * 1024 * 1024,
        // unknown unit: multiplier 1 (value taken as raw bytes)
        _ => 1,
    }
}
