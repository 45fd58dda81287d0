//! Table sort stage, applied after filtering.

use std::cmp::Ordering;

use dispo_map_sales_models::{SalesEntity, TrendBucket};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sortable table columns.
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
pub enum SortColumn {
    /// Licensee or company name.
    Name,
    /// First city served.
    City,
    /// Region name.
    Region,
    /// Most recent month's sales.
    #[default]
    LatestSales,
    /// Average monthly sales.
    AvgMonthlySales,
    /// Growth rate.
    GrowthRate,
    /// Coarse trend, `up` before `stable` before `down` when ascending.
    Trend,
    /// Number of locations.
    LocationCount,
}

/// Sort direction.
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
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Column and direction to sort by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortSpec {
    /// Column.
    pub column: SortColumn,
    /// Direction.
    pub direction: SortDirection,
}

/// Sorts rows in place.
///
/// The sort is stable. Rows that compare equal on the column are ordered
/// by name, ascending and case-insensitive, regardless of direction.
pub fn sort_rows<T: SalesEntity>(rows: &mut [&T], order: SortSpec) {
    rows.sort_by(|a, b| {
        let ord = compare(*a, *b, order.column);
        let ord = match order.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        ord.then_with(|| compare_text(a.name(), b.name()))
    });
}

fn compare<T: SalesEntity>(a: &T, b: &T, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => compare_text(a.name(), b.name()),
        SortColumn::City => compare_text(first_city(a), first_city(b)),
        SortColumn::Region => compare_text(a.region().unwrap_or(""), b.region().unwrap_or("")),
        SortColumn::LatestSales => a.latest_sales().total_cmp(&b.latest_sales()),
        SortColumn::AvgMonthlySales => a.avg_monthly_sales().total_cmp(&b.avg_monthly_sales()),
        SortColumn::GrowthRate => a.growth_rate().total_cmp(&b.growth_rate()),
        SortColumn::Trend => trend_rank(a.trend_bucket()).cmp(&trend_rank(b.trend_bucket())),
        SortColumn::LocationCount => a.location_count().cmp(&b.location_count()),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn first_city<T: SalesEntity>(row: &T) -> &str {
    row.cities().first().copied().unwrap_or("")
}

const fn trend_rank(bucket: TrendBucket) -> u8 {
    match bucket {
        TrendBucket::Up => 0,
        TrendBucket::Stable => 1,
        TrendBucket::Down => 2,
    }
}
