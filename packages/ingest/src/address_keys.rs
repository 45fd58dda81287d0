//! Address-key sheet for preparing the geocode cache by hand.
//!
//! [`address_key_rows`] lists every distinct location address with its two
//! cache keys and blank `lat`/`lng` columns. Once the coordinates are
//! filled in, [`build_cache`] turns the sheet into the cache document the
//! resolver reads.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};

use dispo_map_geocoder::keys::{key_with_zip, key_without_zip};
use dispo_map_sales_models::{Coordinate, LocationRecord, PostalCode};
use serde::{Deserialize, Serialize};

use crate::IngestError;

/// One row of the sheet. Column order matches field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressKeyRow {
    /// `"<address>, <city> <zip>"`.
    pub key_with_zip: String,
    /// `"<address>, <city>"`.
    pub key_no_zip: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal code as text.
    pub zip: String,
    /// First licensee seen at this address.
    pub licensee: String,
    /// Latitude, blank until filled in.
    pub lat: String,
    /// Longitude, blank until filled in.
    pub lng: String,
}

impl AddressKeyRow {
    /// The row's coordinate, if both columns hold finite numbers.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.lat.trim().parse().ok()?;
        let lng = self.lng.trim().parse().ok()?;
        Coordinate::new(lat, lng)
    }
}

/// One sheet row per distinct `(address, city, zip)`, compared without
/// case, sorted by city then address.
#[must_use]
pub fn address_key_rows(locations: &[LocationRecord]) -> Vec<AddressKeyRow> {
    let mut seen: BTreeSet<(String, String, String)> = BTreeSet::new();
    let mut rows = Vec::new();

    for location in locations {
        let address = location.address.trim();
        let city = location.city.trim();
        let zip = location
            .zip
            .as_ref()
            .and_then(PostalCode::raw)
            .unwrap_or_default();

        if !seen.insert((address.to_lowercase(), city.to_lowercase(), zip.clone())) {
            continue;
        }

        rows.push(AddressKeyRow {
            key_with_zip: key_with_zip(address, city, &zip),
            key_no_zip: key_without_zip(address, city),
            address: address.to_string(),
            city: city.to_string(),
            zip,
            licensee: location.licensee.trim().to_string(),
            lat: String::new(),
            lng: String::new(),
        });
    }

    rows.sort_by_cached_key(|r| (r.city.to_lowercase(), r.address.to_lowercase()));
    rows
}

/// Writes the sheet as CSV with a header row.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if writing fails.
pub fn write_address_keys(rows: &[AddressKeyRow], writer: impl Write) -> Result<(), IngestError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads a sheet. Malformed rows are skipped.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if the header row cannot be read.
pub fn read_address_keys(reader: impl Read) -> Result<Vec<AddressKeyRow>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    csv_reader.headers()?;

    let mut rows = Vec::new();
    for result in csv_reader.deserialize::<AddressKeyRow>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => log::trace!("Skipping malformed address-key row: {e}"),
        }
    }
    Ok(rows)
}

/// Builds cache entries from a filled sheet.
///
/// Each row with a usable coordinate contributes both of its keys. Rows
/// without coordinates are skipped; later rows win on duplicate keys.
#[must_use]
pub fn build_cache(rows: &[AddressKeyRow]) -> BTreeMap<String, Coordinate> {
    let mut cache = BTreeMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let Some(coordinate) = row.coordinate() else {
            skipped += 1;
            continue;
        };
        for key in [row.key_with_zip.trim(), row.key_no_zip.trim()] {
            if !key.is_empty() {
                cache.insert(key.to_string(), coordinate);
            }
        }
    }

    log::info!(
        "Built {} cache keys from {} rows ({skipped} without coordinates)",
        cache.len(),
        rows.len()
    );
    cache
}

/// Renders cache entries as the JSON cache document.
///
/// # Errors
///
/// Returns [`IngestError::Json`] if serialization fails.
pub fn cache_document(cache: &BTreeMap<String, Coordinate>) -> Result<String, IngestError> {
    Ok(serde_json::to_string_pretty(cache)?)
}
