//! One full view computation.
//!
//! Each call starts from the loaded dataset and recomputes everything:
//! company rollups, filtering, sorting, coordinates, and statistics.
//! Nothing is cached between calls.

use dispo_map_analytics::{aggregate, regional_stats, summarize};
use dispo_map_analytics_models::{RegionalStats, TrendSummary};
use dispo_map_geocoder::{CoordinateResolver, GeoCache, GeoContext, Resolution, ResolutionStats};
use dispo_map_geography_models::centroids::CentroidTable;
use dispo_map_sales_models::{CompanyAggregate, LocationRecord, SalesDataset, SalesEntity};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::config::EngineConfig;
use crate::filter::{FilterCriteria, filter};
use crate::sort::{SortSpec, sort_rows};
use crate::sparkline::{PlotPoint, SparklineFrame, plot_row};

/// Which dataset the view shows.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ViewMode {
    /// One row per physical location, with map markers.
    #[default]
    Locations,
    /// One row per company rollup, table only.
    Companies,
}

/// Everything the user has selected for one computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Active dataset.
    pub view: ViewMode,
    /// Filter predicates.
    pub filters: FilterCriteria,
    /// Sort order.
    pub sort: SortSpec,
}

/// A location row with its map placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappedLocation {
    /// The record as loaded.
    #[serde(flatten)]
    pub record: LocationRecord,
    /// Where to draw the marker, or unresolved.
    pub position: Resolution,
}

/// Filtered, sorted rows of the active view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", content = "rows", rename_all = "snake_case")]
pub enum ViewRows {
    /// Location rows.
    Locations(Vec<MappedLocation>),
    /// Company rows.
    Companies(Vec<CompanyAggregate>),
}

impl ViewRows {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Locations(rows) => rows.len(),
            Self::Companies(rows) => rows.len(),
        }
    }

    /// Whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row names in display order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Locations(rows) => rows.iter().map(|r| r.record.name()).collect(),
            Self::Companies(rows) => rows.iter().map(SalesEntity::name).collect(),
        }
    }

    /// Sparkline geometry for every row, in display order.
    #[must_use]
    pub fn sparklines(&self, frame: &SparklineFrame) -> Vec<Vec<PlotPoint>> {
        match self {
            Self::Locations(rows) => rows.iter().map(|r| plot_row(&r.record, frame)).collect(),
            Self::Companies(rows) => rows.iter().map(|r| plot_row(r, frame)).collect(),
        }
    }

    /// Resolved marker coordinates; empty for the company view.
    #[must_use]
    pub fn markers(&self) -> Vec<(&LocationRecord, Resolution)> {
        match self {
            Self::Locations(rows) => rows
                .iter()
                .filter(|r| r.position != Resolution::Unresolved)
                .map(|r| (&r.record, r.position))
                .collect(),
            Self::Companies(_) => Vec::new(),
        }
    }
}

/// Result of [`compute_view`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewOutput {
    /// Rows before filtering.
    pub unfiltered: usize,
    /// Filtered, sorted rows.
    #[serde(flatten)]
    pub rows: ViewRows,
    /// Coarse trend counts over the filtered rows.
    pub summary: TrendSummary,
    /// Per-region counts over the filtered rows.
    pub regions: Vec<RegionalStats>,
    /// Coordinate resolution counts; only for the location view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<ResolutionStats>,
}

/// Computes the active view from scratch.
///
/// The company view uses the dataset's pre-aggregated companies when it
/// has them and otherwise aggregates the locations with the configured
/// trend policy.
#[must_use]
pub fn compute_view(
    dataset: &SalesDataset,
    geo_cache: &GeoCache,
    config: &EngineConfig,
    view_config: &ViewConfig,
) -> ViewOutput {
    let known_cities = dataset.known_cities();

    match view_config.view {
        ViewMode::Locations => {
            let mut rows = filter(&dataset.locations, &view_config.filters, &known_cities);
            sort_rows(&mut rows, view_config.sort);

            let centroids = CentroidTable::new_mexico();
            let ctx = GeoContext {
                cache: geo_cache,
                centroids: &centroids,
            };
            let resolver = CoordinateResolver::new(config.resolver.jitter_scale);
            let (positions, stats) = resolver.resolve_all(rows.iter().copied(), &ctx);

            let summary = summarize(&rows);
            let regions = regional_stats(&rows, &dataset.regions);
            let mapped = rows
                .into_iter()
                .zip(positions)
                .map(|(record, position)| MappedLocation {
                    record: record.clone(),
                    position,
                })
                .collect();

            ViewOutput {
                unfiltered: dataset.locations.len(),
                rows: ViewRows::Locations(mapped),
                summary,
                regions,
                resolution: Some(stats),
            }
        }
        ViewMode::Companies => {
            let computed;
            let companies: &[CompanyAggregate] = if let Some(companies) = &dataset.companies {
                companies
            } else {
                computed = aggregate(&dataset.locations, &config.trend);
                log::debug!(
                    "Aggregated {} locations into {} companies",
                    dataset.locations.len(),
                    computed.len()
                );
                &computed
            };

            let mut rows = filter(companies, &view_config.filters, &known_cities);
            sort_rows(&mut rows, view_config.sort);

            let summary = summarize(&rows);
            let regions = regional_stats(&rows, &dataset.regions);

            ViewOutput {
                unfiltered: companies.len(),
                rows: ViewRows::Companies(rows.into_iter().cloned().collect()),
                summary,
                regions,
                resolution: None,
            }
        }
    }
}
