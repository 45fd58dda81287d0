//! Sparkline geometry.
//!
//! Turns a monthly series into draw coordinates inside a
//! `width` × `height` box, independent of any rendering surface. `y` grows
//! downward, so larger values get smaller `y`.

use dispo_map_sales_models::{MonthlyPoint, SalesEntity, sorted_valid_points};
use serde::{Deserialize, Serialize};

/// Drawing box for a sparkline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparklineFrame {
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Inset kept clear on every side.
    pub padding: f64,
}

impl Default for SparklineFrame {
    fn default() -> Self {
        Self {
            width: 120.0,
            height: 32.0,
            padding: 2.0,
        }
    }
}

impl SparklineFrame {
    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> PlotPoint {
        PlotPoint {
            x: self.width / 2.0,
            y: self.height / 2.0,
        }
    }
}

/// One draw coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, top is zero.
    pub y: f64,
}

/// Plots a monthly series.
///
/// Invalid points are dropped and the rest sorted by month. Fewer than two
/// values produce a single centered point; a flat series produces its two
/// endpoints at vertical center.
#[must_use]
pub fn plot(series: &[MonthlyPoint], frame: &SparklineFrame) -> Vec<PlotPoint> {
    let values: Vec<f64> = sorted_valid_points(series)
        .into_iter()
        .map(|p| p.total)
        .collect();
    plot_values(&values, frame)
}

/// Plots a row's monthly series.
#[must_use]
pub fn plot_row<T: SalesEntity>(row: &T, frame: &SparklineFrame) -> Vec<PlotPoint> {
    plot(row.monthly_data(), frame)
}

/// Plots values that are already in chronological order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn plot_values(values: &[f64], frame: &SparklineFrame) -> Vec<PlotPoint> {
    if values.len() < 2 {
        return vec![frame.center()];
    }

    let left = frame.padding;
    let right = frame.width - frame.padding;
    let top = frame.padding;
    let bottom = frame.height - frame.padding;

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    if range == 0.0 {
        let mid = frame.height / 2.0;
        return vec![PlotPoint { x: left, y: mid }, PlotPoint { x: right, y: mid }];
    }

    let last = values.len() - 1;
    let step = (right - left) / last as f64;

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = if i == last {
                right
            } else {
                left + step * i as f64
            };
            let y = top + (max - v) / range * (bottom - top);
            PlotPoint { x, y }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: SparklineFrame = SparklineFrame {
        width: 100.0,
        height: 40.0,
        padding: 5.0,
    };

    fn series(totals: &[f64]) -> Vec<MonthlyPoint> {
        totals
            .iter()
            .enumerate()
            .map(|(i, &t)| MonthlyPoint::new(format!("2025-{:02}", i + 1), t, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn single_point_is_centered() {
        assert_eq!(
            plot(&series(&[42.0]), &FRAME),
            [PlotPoint { x: 50.0, y: 20.0 }]
        );
    }

    #[test]
    fn empty_or_invalid_series_matches_single_point() {
        let invalid = vec![MonthlyPoint {
            total_sales: None,
            ..MonthlyPoint::new("2025-01", 0.0, 0.0, 0.0)
        }];
        assert_eq!(plot(&[], &FRAME), plot(&series(&[1.0]), &FRAME));
        assert_eq!(plot(&invalid, &FRAME), plot(&series(&[1.0]), &FRAME));
    }

    #[test]
    fn constant_series_is_flat_line_at_center() {
        assert_eq!(
            plot(&series(&[500.0, 500.0, 500.0]), &FRAME),
            [PlotPoint { x: 5.0, y: 20.0 }, PlotPoint { x: 95.0, y: 20.0 }]
        );
    }

    #[test]
    fn linear_mapping_inverts_y_and_pins_endpoints() {
        let points = plot(&series(&[0.0, 50.0, 100.0]), &FRAME);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], PlotPoint { x: 5.0, y: 35.0 });
        assert_eq!(points[1], PlotPoint { x: 50.0, y: 20.0 });
        assert_eq!(points[2], PlotPoint { x: 95.0, y: 5.0 });
    }

    #[test]
    fn sorts_by_month_before_plotting() {
        let mut points = series(&[0.0, 100.0]);
        points.reverse();
        let plotted = plot(&points, &FRAME);
        assert!(plotted[0].y > plotted[1].y, "earlier, smaller value sits lower");
    }

    #[test]
    fn uneven_step_still_ends_on_right_edge() {
        let frame = SparklineFrame {
            width: 10.0,
            height: 10.0,
            padding: 0.1,
        };
        let points = plot_values(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0], &frame);
        assert_eq!(points.first().map(|p| p.x), Some(0.1));
        assert_eq!(points.last().map(|p| p.x), Some(10.0 - 0.1));
    }
}
