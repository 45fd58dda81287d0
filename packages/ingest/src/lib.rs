#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loading the inputs the dashboard engine consumes.
//!
//! The sales document and geocode cache are produced offline. This crate
//! reads them, fills in the fields older documents leave out (region,
//! company identity), and provides the two cache-preparation steps:
//! exporting an address-key sheet to fill in by hand and converting a
//! filled sheet back into a cache document.

pub mod address_keys;
pub mod company;
pub mod dataset;
pub mod geocache;

use thiserror::Error;

pub use dataset::{load_dataset, parse_dataset};
pub use geocache::load_geo_cache;

/// Errors that can occur while loading or converting input documents.
#[derive(Debug, Error)]
pub enum IngestError {
    /// File read/write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The document has no `locations` or legacy `dispensaries` records.
    #[error("No dispensary locations found in document")]
    MissingLocations,
}
