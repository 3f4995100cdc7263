//! Small helpers shared across the pipeline: timestamps, whitespace
//! normalization, and character-based truncation.

use chrono::Local;

/// Local ISO-8601 timestamp at second precision, e.g. `2025-01-01T08:30:00`.
///
/// Used for `fetched_at` / `scraped_at` stamps; taken at the moment of the
/// corresponding action, never backdated.
pub fn now_iso() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Collapse runs of whitespace (including newlines) to single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` characters of a string.
///
/// Character-based, not byte-based, so multi-byte text is never split
/// mid-codepoint.
pub fn char_prefix(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
