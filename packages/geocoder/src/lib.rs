#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate resolution for dispensary locations.
//!
//! Assigns a map coordinate to every [`LocationRecord`] using an ordered
//! chain of resolution tiers, first success wins:
//!
//! 1. **Explicit**: latitude/longitude carried on the record itself.
//! 2. **Cache (exact)**: the pre-built geocode cache, keyed by
//!    `"<address>, <city>"` with optional postal-code variants.
//! 3. **Cache (normalized)**: the same keys canonicalized (case,
//!    punctuation, whitespace) against the cache's normalized index.
//! 4. **City centroid**: the city's reference point plus a small
//!    deterministic [`jitter`] so co-located records separate visually.
//!
//! No network lookups happen here; the cache is produced offline.
//!
//! [`LocationRecord`]: dispo_map_sales_models::LocationRecord

pub mod cache;
pub mod jitter;
pub mod keys;
pub mod normalize;
pub mod resolver;

use thiserror::Error;

pub use cache::GeoCache;
pub use resolver::{
    CoordinateResolver, CoordinateSource, GeoContext, Resolution, ResolutionStats,
    ResolutionTier,
};

/// Default jitter scale (degrees) applied around city centroids.
pub const DEFAULT_JITTER_SCALE: f64 = 0.004;

/// Errors from geocode cache operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The cache document is not valid JSON or not a key/value mapping.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
