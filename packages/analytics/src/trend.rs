//! Series-derived trend classification.
//!
//! The classifier compares a "recent" level against a "previous" level of
//! the monthly totals. Long series use the last two windows of
//! [`TrendPolicy::window`] months, blending a weighted mean with the
//! median; short series split in half and compare medians. A change only
//! counts when it is both statistically distinguishable from noise and
//! larger than a stability threshold that shrinks as sales volume grows.

use dispo_map_analytics_models::TrendAssessment;
use dispo_map_sales_models::{MonthlyPoint, TrendConfidence, TrendDirection, sorted_valid_points};
use serde::{Deserialize, Serialize};

/// Tunable constants for [`classify`].
///
/// The same policy is applied to single-location series and to merged
/// company series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPolicy {
    /// Fewer usable points than this is `insufficient_data`. Values below
    /// two are treated as two.
    pub min_points: usize,
    /// Average monthly sales below this use [`Self::small_volume_threshold`].
    pub small_volume_limit: f64,
    /// Relative change needed to leave `stable` for small sellers.
    pub small_volume_threshold: f64,
    /// Average monthly sales below this use [`Self::medium_volume_threshold`].
    pub medium_volume_limit: f64,
    /// Relative change needed to leave `stable` for medium sellers.
    pub medium_volume_threshold: f64,
    /// Relative change needed to leave `stable` for everyone else.
    pub large_volume_threshold: f64,
    /// Weights for the most recent window, oldest month first.
    pub recent_weights: Vec<f64>,
    /// Weights for the window before it, oldest month first.
    pub previous_weights: Vec<f64>,
    /// Share of the weighted mean in the blended level; the median gets
    /// the remainder.
    pub weighted_share: f64,
    /// A change is significant when it exceeds this many standard errors.
    pub significance_factor: f64,
    /// `up`/`down` become `strong_*` past this multiple of the threshold,
    /// for high-confidence series only.
    pub strong_multiplier: f64,
    /// Minimum points for `high` confidence.
    pub high_confidence_min_points: usize,
    /// Coefficient of variation must be below this for `high` confidence.
    pub high_confidence_max_cv: f64,
    /// Minimum points for `medium` confidence.
    pub medium_confidence_min_points: usize,
    /// Coefficient of variation must be below this for `medium` confidence.
    pub medium_confidence_max_cv: f64,
}

impl Default for TrendPolicy {
    fn default() -> Self {
        Self {
            min_points: 4,
            small_volume_limit: 50_000.0,
            small_volume_threshold: 0.25,
            medium_volume_limit: 200_000.0,
            medium_volume_threshold: 0.15,
            large_volume_threshold: 0.10,
            recent_weights: vec![1.5, 1.25, 1.0],
            previous_weights: vec![1.0, 1.25, 1.5],
            weighted_share: 0.6,
            significance_factor: 1.5,
            strong_multiplier: 2.0,
            high_confidence_min_points: 6,
            high_confidence_max_cv: 0.5,
            medium_confidence_min_points: 4,
            medium_confidence_max_cv: 1.0,
        }
    }
}

impl TrendPolicy {
    /// Relative change required to call a series anything but `stable`.
    #[must_use]
    pub fn stability_threshold(&self, avg_monthly_sales: f64) -> f64 {
        if avg_monthly_sales < self.small_volume_limit {
            self.small_volume_threshold
        } else if avg_monthly_sales < self.medium_volume_limit {
            self.medium_volume_threshold
        } else {
            self.large_volume_threshold
        }
    }

    /// Number of months in each comparison window of the long-series path.
    #[must_use]
    pub fn window(&self) -> usize {
        self.recent_weights.len().min(self.previous_weights.len())
    }

    fn confidence(&self, n: usize, cv: f64) -> TrendConfidence {
        if n >= self.high_confidence_min_points && cv < self.high_confidence_max_cv {
            TrendConfidence::High
        } else if n >= self.medium_confidence_min_points && cv < self.medium_confidence_max_cv {
            TrendConfidence::Medium
        } else {
            TrendConfidence::Low
        }
    }

    fn blended(&self, values: &[f64], weights: &[f64]) -> f64 {
        self.weighted_share * weighted_mean(values, weights)
            + (1.0 - self.weighted_share) * median(values)
    }
}

/// Classifies a monthly series.
///
/// Invalid points are dropped and the rest sorted by month before the
/// totals are handed to [`classify_totals`].
#[must_use]
pub fn classify(series: &[MonthlyPoint], policy: &TrendPolicy) -> TrendAssessment {
    let totals: Vec<f64> = sorted_valid_points(series)
        .into_iter()
        .map(|p| p.total)
        .collect();
    classify_totals(&totals, policy)
}

/// Classifies chronologically ordered monthly totals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify_totals(totals: &[f64], policy: &TrendPolicy) -> TrendAssessment {
    let n = totals.len();
    if n < policy.min_points.max(2) {
        return TrendAssessment::insufficient(n);
    }

    let avg = mean(totals);
    let std_dev = sample_std_dev(totals, avg);
    let cv = if avg > 0.0 { std_dev / avg } else { 0.0 };
    let confidence = policy.confidence(n, cv);

    let (lo, hi) = totals
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if hi - lo == 0.0 {
        return TrendAssessment {
            direction: TrendDirection::Stable,
            growth_rate: 0.0,
            confidence,
            data_points: n,
        };
    }

    let window = policy.window();
    let (recent, previous) = if window > 0 && n >= window * 2 {
        let recent = &totals[n - window..];
        let previous = &totals[n - window * 2..n - window];
        (
            policy.blended(recent, &policy.recent_weights[..window]),
            policy.blended(previous, &policy.previous_weights[..window]),
        )
    } else {
        let mid = n / 2;
        (median(&totals[mid..]), median(&totals[..mid]))
    };

    let pct = if previous > 0.0 {
        (recent - previous) / previous
    } else {
        0.0
    };

    let threshold = policy.stability_threshold(avg);
    let significant =
        (recent - previous).abs() > policy.significance_factor * std_dev / (n as f64).sqrt();

    let direction = if !significant || pct.abs() < threshold {
        TrendDirection::Stable
    } else {
        let strong = confidence == TrendConfidence::High
            && pct.abs() > threshold * policy.strong_multiplier;
        match (pct > 0.0, strong) {
            (true, true) => TrendDirection::StrongUp,
            (true, false) => TrendDirection::Up,
            (false, true) => TrendDirection::StrongDown,
            (false, false) => TrendDirection::Down,
        }
    };

    TrendAssessment {
        direction,
        growth_rate: pct * 100.0,
        confidence,
        data_points: n,
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[allow(clippy::cast_precision_loss)]
fn sample_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}

fn weighted_mean(values: &[f64], weights: &[f64]) -> f64 {
    let total_weight: f64 = weights.iter().take(values.len()).sum();
    if total_weight == 0.0 {
        return mean(values);
    }
    values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total_weight
}
