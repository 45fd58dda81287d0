//! Tiered coordinate resolution.
//!
//! Each tier is an independent [`ResolutionTier`] sharing one signature.
//! The [`CoordinateResolver`] runs them in priority order and stops at
//! the first hit; results from different tiers are never blended.

use dispo_map_geography_models::centroids::CentroidTable;
use dispo_map_sales_models::{Coordinate, LocationRecord};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::cache::GeoCache;
use crate::jitter::jitter;
use crate::keys::record_candidate_keys;

/// Read-only lookup sources shared by all tiers.
#[derive(Debug, Clone, Copy)]
pub struct GeoContext<'a> {
    /// Geocode cache with its normalized index.
    pub cache: &'a GeoCache,
    /// City centroid table.
    pub centroids: &'a CentroidTable,
}

/// Which tier produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CoordinateSource {
    /// Coordinates carried on the record.
    Explicit,
    /// Exact geocode cache key.
    CacheExact,
    /// Normalized geocode cache key.
    CacheNormalized,
    /// City centroid plus jitter.
    CityCentroid,
}

/// Outcome of resolving one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// A coordinate was found.
    Resolved {
        /// The coordinate.
        coordinate: Coordinate,
        /// The tier that produced it.
        source: CoordinateSource,
    },
    /// No tier could place the record; it is kept out of spatial output.
    Unresolved,
}

impl Resolution {
    /// The coordinate, if resolved.
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Resolved { coordinate, .. } => Some(*coordinate),
            Self::Unresolved => None,
        }
    }
}

/// A single fallible resolution strategy.
pub trait ResolutionTier {
    /// Identifies this tier in diagnostics.
    fn source(&self) -> CoordinateSource;

    /// Attempts to place `record`.
    fn resolve(&self, record: &LocationRecord, ctx: &GeoContext<'_>) -> Option<Coordinate>;
}

/// Accepts the record's own latitude/longitude when both are finite.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitTier;

impl ResolutionTier for ExplicitTier {
    fn source(&self) -> CoordinateSource {
        CoordinateSource::Explicit
    }

    fn resolve(&self, record: &LocationRecord, _ctx: &GeoContext<'_>) -> Option<Coordinate> {
        record.explicit_coordinate()
    }
}

/// Looks up each candidate key verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCacheTier;

impl ResolutionTier for ExactCacheTier {
    fn source(&self) -> CoordinateSource {
        CoordinateSource::CacheExact
    }

    fn resolve(&self, record: &LocationRecord, ctx: &GeoContext<'_>) -> Option<Coordinate> {
        record_candidate_keys(record)
            .iter()
            .find_map(|key| ctx.cache.lookup_exact(key))
    }
}

/// Looks up each candidate key in the normalized index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedCacheTier;

impl ResolutionTier for NormalizedCacheTier {
    fn source(&self) -> CoordinateSource {
        CoordinateSource::CacheNormalized
    }

    fn resolve(&self, record: &LocationRecord, ctx: &GeoContext<'_>) -> Option<Coordinate> {
        record_candidate_keys(record)
            .iter()
            .find_map(|key| ctx.cache.lookup_normalized(key))
    }
}

/// Places the record at its city's centroid, offset by a deterministic
/// jitter seeded from `"<address>|<licensee>"`.
#[derive(Debug, Clone, Copy)]
pub struct CityCentroidTier {
    /// Full width of the jitter square, in degrees.
    pub jitter_scale: f64,
}

impl CityCentroidTier {
    /// The jitter seed for a record.
    #[must_use]
    pub fn seed(record: &LocationRecord) -> String {
        let name = if record.licensee.trim().is_empty() {
            record.company_key()
        } else {
            record.licensee.as_str()
        };
        format!("{}|{}", record.address, name)
    }
}

impl ResolutionTier for CityCentroidTier {
    fn source(&self) -> CoordinateSource {
        CoordinateSource::CityCentroid
    }

    fn resolve(&self, record: &LocationRecord, ctx: &GeoContext<'_>) -> Option<Coordinate> {
        let centroid = ctx.centroids.get(&record.city)?;
        let (dlat, dlng) = jitter(&Self::seed(record), self.jitter_scale);
        centroid.offset(dlat, dlng)
    }
}

/// Per-tier counts for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    /// Records placed by their own coordinates.
    pub explicit: usize,
    /// Records placed by an exact cache key.
    pub cache_exact: usize,
    /// Records placed by a normalized cache key.
    pub cache_normalized: usize,
    /// Records placed at a city centroid.
    pub city_centroid: usize,
    /// Records that could not be placed.
    pub unresolved: usize,
}

impl ResolutionStats {
    /// Counts one outcome.
    pub fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Resolved { source, .. } => match source {
                CoordinateSource::Explicit => self.explicit += 1,
                CoordinateSource::CacheExact => self.cache_exact += 1,
                CoordinateSource::CacheNormalized => self.cache_normalized += 1,
                CoordinateSource::CityCentroid => self.city_centroid += 1,
            },
            Resolution::Unresolved => self.unresolved += 1,
        }
    }

    /// Number of records placed by any tier.
    #[must_use]
    pub const fn resolved(&self) -> usize {
        self.explicit + self.cache_exact + self.cache_normalized + self.city_centroid
    }

    /// Number of records seen.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.resolved() + self.unresolved
    }
}

/// Ordered chain of resolution tiers.
pub struct CoordinateResolver {
    tiers: Vec<Box<dyn ResolutionTier>>,
}

impl std::fmt::Debug for CoordinateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sources: Vec<CoordinateSource> = self.tiers.iter().map(|t| t.source()).collect();
        f.debug_struct("CoordinateResolver")
            .field("tiers", &sources)
            .finish()
    }
}

impl Default for CoordinateResolver {
    fn default() -> Self {
        Self::new(crate::DEFAULT_JITTER_SCALE)
    }
}

impl CoordinateResolver {
    /// The standard four-tier chain.
    #[must_use]
    pub fn new(jitter_scale: f64) -> Self {
        Self::with_tiers(vec![
            Box::new(ExplicitTier),
            Box::new(ExactCacheTier),
            Box::new(NormalizedCacheTier),
            Box::new(CityCentroidTier { jitter_scale }),
        ])
    }

    /// A custom chain, tried in the given order.
    #[must_use]
    pub fn with_tiers(tiers: Vec<Box<dyn ResolutionTier>>) -> Self {
        Self { tiers }
    }

    /// Resolves one record; the first tier that succeeds wins.
    #[must_use]
    pub fn resolve(&self, record: &LocationRecord, ctx: &GeoContext<'_>) -> Resolution {
        self.tiers
            .iter()
            .find_map(|tier| {
                tier.resolve(record, ctx)
                    .map(|coordinate| Resolution::Resolved {
                        coordinate,
                        source: tier.source(),
                    })
            })
            .unwrap_or(Resolution::Unresolved)
    }

    /// Resolves every record, returning outcomes in input order together
    /// with per-tier counts.
    #[must_use]
    pub fn resolve_all<'r>(
        &self,
        records: impl IntoIterator<Item = &'r LocationRecord>,
        ctx: &GeoContext<'_>,
    ) -> (Vec<Resolution>, ResolutionStats) {
        let mut stats = ResolutionStats::default();
        let resolutions: Vec<Resolution> = records
            .into_iter()
            .map(|record| {
                let resolution = self.resolve(record, ctx);
                if resolution == Resolution::Unresolved {
                    log::debug!(
                        "No coordinate for {} at {:?} in {:?}",
                        record.licensee,
                        record.address,
                        record.city
                    );
                }
                stats.record(&resolution);
                resolution
            })
            .collect();

        log::info!(
            "Resolved {}/{} locations (explicit={}, cache_exact={}, cache_normalized={}, centroid={}, unresolved={})",
            stats.resolved(),
            stats.total(),
            stats.explicit,
            stats.cache_exact,
            stats.cache_normalized,
            stats.city_centroid,
            stats.unresolved
        );

        (resolutions, stats)
    }
}
