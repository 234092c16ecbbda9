//! Core types for the shift ledger

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters a sheet backend cannot carry in a sheet title
const FORBIDDEN_KEY_CHARS: &[char] = &['[', ']', '*', '/', '\\', '?', ':'];

/// Maximum sheet title length
const MAX_KEY_LEN: usize = 100;

/// Sanitized, stable operator key
///
/// Doubles as the sheet title for the operator's ledger, so construction
/// strips characters sheet backends reject, trims whitespace, caps the
/// length, and falls back to `Unknown` for empty input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorKey(String);

impl OperatorKey {
    /// Create a key from a raw operator name
    pub fn new(raw: impl AsRef<str>) -> Self {
        let cleaned: String = raw
            .as_ref()
            .chars()
            .filter(|c| !FORBIDDEN_KEY_CHARS.contains(c))
            .collect();
        let trimmed = cleaned.trim();

        if trimmed.is_empty() {
            return Self("Unknown".to_string());
        }

        Self(trimmed.chars().take(MAX_KEY_LEN).collect())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One immutable submission row
///
/// `values` holds the amount for every configured category, in configured
/// category order. `daily_total` and `weekly_accumulated` are derived by the
/// ledger, never supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Calendar day of the submission, reference time zone
    pub date: NaiveDate,

    /// Per-category amounts, configured category order
    pub values: Vec<u64>,

    /// Sum of `values`
    pub daily_total: u64,

    /// Running sum of `daily_total` since the last weekly reset, inclusive
    pub weekly_accumulated: u64,

    /// Time of day of the submission, reference time zone
    pub time: NaiveTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strips_forbidden_chars() {
        let key = OperatorKey::new("a[b]c*d/e\\f?g:h");
        assert_eq!(key.as_str(), "abcdefgh");
    }

    #[test]
    fn test_key_trims_whitespace() {
        let key = OperatorKey::new("  ana maria  ");
        assert_eq!(key.as_str(), "ana maria");
    }

    #[test]
    fn test_empty_key_falls_back() {
        assert_eq!(OperatorKey::new("").as_str(), "Unknown");
        assert_eq!(OperatorKey::new("  */  ").as_str(), "Unknown");
    }

    #[test]
    fn test_long_key_is_capped() {
        let raw = "x".repeat(250);
        assert_eq!(OperatorKey::new(&raw).as_str().len(), 100);
    }
}
