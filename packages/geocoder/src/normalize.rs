//! Lookup-key normalization.
//!
//! The live dataset and the geocode cache are produced independently, so
//! the same address often differs in case, punctuation, or spacing. The
//! canonical form is applied symmetrically when building the normalized
//! index and when querying it.

use regex::Regex;
use std::sync::LazyLock;

/// Periods and commas are dropped outright.
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,]+").expect("valid regex"));

/// Runs of whitespace collapse to a single space.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Canonicalizes a lookup key.
///
/// The pipeline:
/// 1. Lowercase
/// 2. Strip `.` and `,`
/// 3. Collapse whitespace
/// 4. Trim
#[must_use]
pub fn normalize_key(input: &str) -> String {
    let lower = input.to_lowercase();
    let no_punct = PUNCTUATION_RE.replace_all(&lower, "");
    WHITESPACE_RE.replace_all(&no_punct, " ").trim().to_string()
}
