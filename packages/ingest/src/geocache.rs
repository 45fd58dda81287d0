//! Optional geocode cache loading.
//!
//! A missing or unreadable cache is never fatal: resolution falls back to
//! city centroids, so every failure here degrades to an empty cache with a
//! warning.

use std::path::Path;

use dispo_map_geocoder::GeoCache;

/// Loads the geocode cache at `path`, or an empty cache if there is none.
#[must_use]
pub fn load_geo_cache(path: Option<&Path>) -> GeoCache {
    let Some(path) = path else {
        log::warn!("No geocode cache configured; locations will be placed at city centroids");
        return GeoCache::empty();
    };

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!(
                "Geocode cache {} unavailable ({e}); locations will be placed at city centroids",
                path.display()
            );
            return GeoCache::empty();
        }
    };

    match GeoCache::from_json_str(&json) {
        Ok(cache) => {
            log::info!(
                "Loaded geocode cache from {}: {} keys, {} normalized",
                path.display(),
                cache.len(),
                cache.normalized_len()
            );
            cache
        }
        Err(e) => {
            log::warn!(
                "Geocode cache {} is malformed ({e}); locations will be placed at city centroids",
                path.display()
            );
            GeoCache::empty()
        }
    }
}
