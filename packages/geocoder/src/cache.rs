//! Pre-built geocode cache with a derived normalized index.
//!
//! The cache document maps composite address keys to `{lat, lng}` pairs.
//! On load a second index is derived from the canonicalized form of each
//! key (see [`normalize_key`]) to absorb formatting drift between the
//! cache and the live dataset. Both indexes are read-only after
//! construction.

use std::collections::BTreeMap;

use dispo_map_sales_models::{Coordinate, LenientNumber};
use serde::Deserialize;

use crate::GeocodeError;
use crate::normalize::normalize_key;

/// One cache value as it appears in the document.
#[derive(Debug, Deserialize)]
struct CacheValue {
    #[serde(default)]
    lat: Option<LenientNumber>,
    #[serde(default)]
    lng: Option<LenientNumber>,
}

impl CacheValue {
    fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.lat.as_ref()?.value()?, self.lng.as_ref()?.value()?)
    }
}

/// Exact and normalized address-key indexes.
#[derive(Debug, Clone, Default)]
pub struct GeoCache {
    exact: BTreeMap<String, Coordinate>,
    normalized: BTreeMap<String, Coordinate>,
}

impl GeoCache {
    /// An empty cache; every cache tier misses.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds both indexes from `(key, coordinate)` pairs.
    ///
    /// When two keys normalize to the same form, the one that sorts first
    /// in the exact index wins.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Coordinate)>) -> Self {
        let exact: BTreeMap<String, Coordinate> = entries.into_iter().collect();

        let mut normalized = BTreeMap::new();
        for (key, coordinate) in &exact {
            let norm = normalize_key(key);
            if norm.is_empty() {
                continue;
            }
            normalized.entry(norm).or_insert(*coordinate);
        }

        Self { exact, normalized }
    }

    /// Parses a cache document.
    ///
    /// Entries without finite `lat`/`lng` values are skipped with a
    /// warning rather than failing the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Parse`] if the document is not a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, GeocodeError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let total = raw.len();

        let entries: Vec<(String, Coordinate)> = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let coordinate = serde_json::from_value::<CacheValue>(value)
                    .ok()
                    .and_then(|v| v.coordinate())?;
                Some((key, coordinate))
            })
            .collect();

        let skipped = total - entries.len();
        if skipped > 0 {
            log::warn!("Skipped {skipped} geocode cache entries without usable coordinates");
        }

        Ok(Self::from_entries(entries))
    }

    /// Exact key lookup.
    #[must_use]
    pub fn lookup_exact(&self, key: &str) -> Option<Coordinate> {
        self.exact.get(key).copied()
    }

    /// Normalizes `key` and looks it up in the normalized index.
    #[must_use]
    pub fn lookup_normalized(&self, key: &str) -> Option<Coordinate> {
        self.normalized.get(&normalize_key(key)).copied()
    }

    /// Number of exact keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    /// Number of distinct normalized keys.
    #[must_use]
    pub fn normalized_len(&self) -> usize {
        self.normalized.len()
    }

    /// Whether the cache has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn parses_document_and_skips_bad_entries() {
        let cache = GeoCache::from_json_str(
            r#"{
                "123 Main St, Santa Fe": { "lat": 35.68, "lng": -105.94 },
                "9 Elm St, Taos": { "lat": "36.40", "lng": "-105.57" },
                "1 Nowhere, Hobbs": { "lat": null, "lng": -103.1 },
                "2 Nowhere, Hobbs": "not an object"
            }"#,
        )
        .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.lookup_exact("123 Main St, Santa Fe"),
            Some(coord(35.68, -105.94))
        );
        assert_eq!(cache.lookup_exact("9 Elm St, Taos"), Some(coord(36.40, -105.57)));
        assert!(cache.lookup_exact("1 Nowhere, Hobbs").is_none());
    }

    #[test]
    fn rejects_non_object_documents() {
        assert!(GeoCache::from_json_str("[1, 2, 3]").is_err());
        assert!(GeoCache::from_json_str("not json").is_err());
    }

    #[test]
    fn normalized_index_absorbs_drift() {
        let cache = GeoCache::from_entries([(
            "123 Main St., Santa Fe 87501".to_string(),
            coord(35.68, -105.94),
        )]);

        assert!(cache.lookup_exact("123 Main St Santa Fe 87501").is_none());
        assert_eq!(
            cache.lookup_normalized("123 Main St Santa Fe 87501"),
            Some(coord(35.68, -105.94))
        );
        assert_eq!(
            cache.lookup_normalized("123  MAIN ST, SANTA FE 87501"),
            Some(coord(35.68, -105.94))
        );
    }

    #[test]
    fn normalized_collisions_keep_first_sorted_key() {
        let cache = GeoCache::from_entries([
            ("b Main St".to_string(), coord(2.0, 2.0)),
            ("B MAIN ST".to_string(), coord(1.0, 1.0)),
        ]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.normalized_len(), 1);
        assert_eq!(cache.lookup_normalized("b main st"), Some(coord(1.0, 1.0)));
    }

    #[test]
    fn empty_cache_misses() {
        let cache = GeoCache::empty();
        assert!(cache.is_empty());
        assert!(cache.lookup_exact("anything").is_none());
        assert!(cache.lookup_normalized("anything").is_none());
    }
}
