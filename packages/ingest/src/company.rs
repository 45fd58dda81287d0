//! Company identity from licensee names.
//!
//! Licensees often register each store under a suffixed name such as
//! `"URBAN WELLNESS - 4TH ST RETAIL"`. Stripping the suffix yields the
//! company the store belongs to.

use std::sync::LazyLock;

use regex::Regex;

/// Suffix patterns tried in order; the first capture is the company.
static SUFFIX_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(.+?)\s*-\s*.+$",
        r"(?i)^(.+?LLC)\s*-\s*.+$",
        r"(?i)^(.+?INC)\s*-\s*.+$",
        r"(?i)^(.+?)\s+DISPENSARY\s+.+$",
        r"(?i)^(.+?)\s+RETAIL\s*.+$",
        r"(?i)^(.+?)\s+MANUFACTURER\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Returns the company a licensee name belongs to.
///
/// A pattern match is only accepted when the remaining name is longer
/// than two characters; otherwise the trimmed input is returned.
#[must_use]
pub fn normalize_company_name(licensee: &str) -> String {
    let name = licensee.trim();

    SUFFIX_PATTERNS
        .iter()
        .filter_map(|re| re.captures(name))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|base| base.chars().count() > 2)
        .unwrap_or(name)
        .to_string()
}
