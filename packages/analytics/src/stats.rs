//! Coarse-bucket summary statistics over the active dataset.
//!
//! Counts always use [`TrendBucket`]s, so `strong_up` is counted as `up`
//! and `insufficient_data` as `stable`.

use std::collections::BTreeMap;

use dispo_map_analytics_models::{RegionalStats, TrendSummary};
use dispo_map_sales_models::SalesEntity;

/// Counts rows by coarse trend bucket and totals their average monthly
/// sales.
#[must_use]
pub fn summarize<T: SalesEntity>(rows: &[T]) -> TrendSummary {
    let mut summary = TrendSummary::default();
    for row in rows {
        summary.add(row.trend_bucket(), row.avg_monthly_sales());
    }
    summary
}

/// Per-region summaries.
///
/// Regions appear in the order of `known_regions` first, then any other
/// region found on the rows in alphabetical order. Regions without rows
/// are omitted. Rows without a region are skipped.
#[must_use]
pub fn regional_stats<T: SalesEntity>(rows: &[T], known_regions: &[String]) -> Vec<RegionalStats> {
    let mut by_region: BTreeMap<&str, TrendSummary> = BTreeMap::new();
    for row in rows {
        let Some(region) = row.region().map(str::trim).filter(|r| !r.is_empty()) else {
            continue;
        };
        by_region
            .entry(region)
            .or_default()
            .add(row.trend_bucket(), row.avg_monthly_sales());
    }

    let mut stats = Vec::with_capacity(by_region.len());
    for region in known_regions {
        if let Some(summary) = by_region.remove(region.as_str()) {
            stats.push(RegionalStats {
                region: region.clone(),
                summary,
            });
        }
    }
    stats.extend(by_region.into_iter().map(|(region, summary)| RegionalStats {
        region: region.to_string(),
        summary,
    }));

    log::debug!("Computed stats for {} regions", stats.len());
    stats
}
