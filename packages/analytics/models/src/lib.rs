#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for trend classification and summary statistics.

use dispo_map_sales_models::{TrendBucket, TrendConfidence, TrendDirection};
use serde::{Deserialize, Serialize};

/// Outcome of classifying one monthly sales series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAssessment {
    /// Fine-grained direction.
    pub direction: TrendDirection,
    /// Growth rate in percent. Zero when the series is too short or flat.
    pub growth_rate: f64,
    /// How much the classification can be trusted.
    pub confidence: TrendConfidence,
    /// Number of usable points the classification was based on.
    pub data_points: usize,
}

impl TrendAssessment {
    /// The assessment reported for series that are too short to classify.
    #[must_use]
    pub const fn insufficient(data_points: usize) -> Self {
        Self {
            direction: TrendDirection::InsufficientData,
            growth_rate: 0.0,
            confidence: TrendConfidence::Low,
            data_points,
        }
    }
}

/// Coarse trend counts over a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Number of records counted.
    pub total: usize,
    /// Records in the `up` bucket.
    pub trending_up: usize,
    /// Records in the `down` bucket.
    pub trending_down: usize,
    /// Records in the `stable` bucket.
    pub stable: usize,
    /// Sum of average monthly sales.
    pub total_monthly_sales: f64,
}

impl TrendSummary {
    /// Adds one record to the counts.
    pub fn add(&mut self, bucket: TrendBucket, avg_monthly_sales: f64) {
        self.total += 1;
        match bucket {
            TrendBucket::Up => self.trending_up += 1,
            TrendBucket::Down => self.trending_down += 1,
            TrendBucket::Stable => self.stable += 1,
        }
        if avg_monthly_sales.is_finite() {
            self.total_monthly_sales += avg_monthly_sales;
        }
    }

    /// Count for a single bucket.
    #[must_use]
    pub const fn count(&self, bucket: TrendBucket) -> usize {
        match bucket {
            TrendBucket::Up => self.trending_up,
            TrendBucket::Down => self.trending_down,
            TrendBucket::Stable => self.stable,
        }
    }
}

/// Trend counts for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalStats {
    /// Region name.
    pub region: String,
    /// Counts for records in this region.
    #[serde(flatten)]
    pub summary: TrendSummary,
}
