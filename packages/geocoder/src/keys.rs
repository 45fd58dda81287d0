//! Composite cache keys.
//!
//! Cache keys take the form `"<address>, <city>"`, optionally followed by
//! a space and the postal code. Postal codes that passed through a
//! spreadsheet may have been written as `87507.0`, so a one-decimal
//! variant is generated as well.

use dispo_map_sales_models::{LocationRecord, PostalCode};

/// Builds the `"<address>, <city>"` key.
#[must_use]
pub fn key_without_zip(address: &str, city: &str) -> String {
    format!("{}, {}", address.trim(), city.trim())
}

/// Builds the `"<address>, <city> <zip>"` key.
#[must_use]
pub fn key_with_zip(address: &str, city: &str, zip: &str) -> String {
    format!("{} {}", key_without_zip(address, city), zip.trim())
        .trim()
        .to_string()
}

/// Candidate keys in lookup order: without postal code, with the raw
/// postal code, then with the postal code rendered to one decimal place.
/// Duplicates are dropped.
#[must_use]
pub fn candidate_keys(address: &str, city: &str, zip: Option<&PostalCode>) -> Vec<String> {
    let mut keys = vec![key_without_zip(address, city)];

    if let Some(zip) = zip {
        for rendered in [zip.raw(), zip.one_decimal()].into_iter().flatten() {
            let key = key_with_zip(address, city, &rendered);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    keys
}

/// Candidate keys for a record.
#[must_use]
pub fn record_candidate_keys(record: &LocationRecord) -> Vec<String> {
    candidate_keys(&record.address, &record.city, record.zip.as_ref())
}
