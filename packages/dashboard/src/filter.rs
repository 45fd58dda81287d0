//! Filter pipeline over the active dataset.
//!
//! Every predicate is optional and they combine with logical AND. The
//! filter keeps input order but callers should not rely on it; sorting
//! happens in [`crate::sort`].

use std::collections::BTreeSet;

use dispo_map_sales_models::{SalesEntity, TrendBucket};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Coarse trend selector, with `all` meaning no restriction.
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
pub enum TrendFilter {
    /// Pass everything.
    #[default]
    All,
    /// Only the `up` bucket.
    Up,
    /// Only the `down` bucket.
    Down,
    /// Only the `stable` bucket.
    Stable,
}

impl TrendFilter {
    /// Whether a row in `bucket` passes.
    #[must_use]
    pub const fn matches(self, bucket: TrendBucket) -> bool {
        match self {
            Self::All => true,
            Self::Up => matches!(bucket, TrendBucket::Up),
            Self::Down => matches!(bucket, TrendBucket::Down),
            Self::Stable => matches!(bucket, TrendBucket::Stable),
        }
    }
}

impl From<TrendBucket> for TrendFilter {
    fn from(bucket: TrendBucket) -> Self {
        match bucket {
            TrendBucket::Up => Self::Up,
            TrendBucket::Down => Self::Down,
            TrendBucket::Stable => Self::Stable,
        }
    }
}

/// Active filter predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against the name and the row's
    /// search fields. Blank means no restriction.
    pub search: Option<String>,
    /// Exact region name. Blank means no restriction.
    pub region: Option<String>,
    /// Selected cities. `None`, or a set equal to every known city, means
    /// no restriction.
    pub cities: Option<BTreeSet<String>>,
    /// Coarse trend selector.
    pub trend: TrendFilter,
}

impl FilterCriteria {
    /// Whether no predicate can exclude a row.
    #[must_use]
    pub fn is_pass_through(&self, known_cities: &[&str]) -> bool {
        self.search_needle().is_none()
            && self.region_name().is_none()
            && self.city_set(known_cities).is_none()
            && self.trend == TrendFilter::All
    }

    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn region_name(&self) -> Option<&str> {
        self.region.as_deref().filter(|r| !r.trim().is_empty())
    }

    /// The effective city restriction, or `None` when the selection is
    /// absent or covers every known city.
    fn city_set(&self, known_cities: &[&str]) -> Option<&BTreeSet<String>> {
        let selected = self.cities.as_ref()?;
        let universe: BTreeSet<&str> = known_cities.iter().copied().collect();
        let covers_universe = selected.len() == universe.len()
            && selected.iter().all(|c| universe.contains(c.as_str()));
        (!covers_universe).then_some(selected)
    }
}

/// Applies `criteria` to `rows`.
///
/// `known_cities` is the universe of city names in the dataset, used to
/// recognize an "everything selected" city filter.
#[must_use]
pub fn filter<'a, T: SalesEntity>(
    rows: &'a [T],
    criteria: &FilterCriteria,
    known_cities: &[&str],
) -> Vec<&'a T> {
    let needle = criteria.search_needle();
    let region = criteria.region_name();
    let cities = criteria.city_set(known_cities);

    rows.iter()
        .filter(|row| {
            needle
                .as_deref()
                .is_none_or(|needle| matches_search(*row, needle))
        })
        .filter(|row| region.is_none_or(|region| row.region() == Some(region)))
        .filter(|row| {
            cities.is_none_or(|cities| {
                row.cities()
                    .into_iter()
                    .any(|c| cities.contains(c.trim()))
            })
        })
        .filter(|row| criteria.trend.matches(row.trend_bucket()))
        .collect()
}

fn matches_search<T: SalesEntity>(row: &T, needle: &str) -> bool {
    std::iter::once(row.name())
        .chain(row.search_fields())
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use dispo_map_sales_models::{CompanyAggregate, LocationRecord, SalesDataset, TrendDirection};

    use super::*;

    fn location(name: &str, city: &str, region: &str, trend: &str) -> LocationRecord {
        LocationRecord {
            licensee: name.to_string(),
            address: format!("100 {name} Ave"),
            city: city.to_string(),
            region: Some(region.to_string()),
            trend_direction: Some(trend.to_string()),
            ..LocationRecord::default()
        }
    }

    fn locations() -> Vec<LocationRecord> {
        vec![
            location("Green Leaf", "Taos", "North", "strong_up"),
            location("High Desert", "Taos", "North", "down"),
            location("Mesa Buds", "Hobbs", "South", "up"),
            location("Valley Kind", "Belen", "Central", "stable"),
        ]
    }

    fn known() -> Vec<&'static str> {
        vec!["Belen", "Hobbs", "Taos"]
    }

    fn names<T: SalesEntity>(rows: &[&T]) -> Vec<String> {
        rows.iter().map(|r| r.name().to_string()).collect()
    }

    fn cities(list: &[&str]) -> Option<BTreeSet<String>> {
        Some(list.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn pass_through_returns_everything() {
        let rows = locations();
        let criteria = FilterCriteria {
            search: Some("   ".to_string()),
            region: Some(String::new()),
            cities: cities(&["Taos", "Hobbs", "Belen"]),
            trend: TrendFilter::All,
        };
        assert!(criteria.is_pass_through(&known()));
        assert_eq!(filter(&rows, &criteria, &known()).len(), rows.len());
    }

    #[test]
    fn search_matches_name_address_and_city_case_insensitively() {
        let rows = locations();
        let by = |s: &str| {
            let criteria = FilterCriteria {
                search: Some(s.to_string()),
                ..FilterCriteria::default()
            };
            names(&filter(&rows, &criteria, &known()))
        };
        assert_eq!(by("GREEN"), ["Green Leaf"]);
        assert_eq!(by("mesa buds ave"), ["Mesa Buds"]);
        assert_eq!(by("taos"), ["Green Leaf", "High Desert"]);
        assert!(by("santa fe").is_empty());
    }

    #[test]
    fn region_and_trend_compose_as_intersection() {
        let rows = locations();
        let region_only = FilterCriteria {
            region: Some("North".to_string()),
            ..FilterCriteria::default()
        };
        let trend_only = FilterCriteria {
            trend: TrendFilter::Up,
            ..FilterCriteria::default()
        };
        let both = FilterCriteria {
            region: Some("North".to_string()),
            trend: TrendFilter::Up,
            ..FilterCriteria::default()
        };

        let a = names(&filter(&rows, &region_only, &known()));
        let b = names(&filter(&rows, &trend_only, &known()));
        let expected: Vec<String> = a.iter().filter(|n| b.contains(n)).cloned().collect();

        assert_eq!(names(&filter(&rows, &both, &known())), expected);
        assert_eq!(expected, ["Green Leaf"]);
    }

    #[test]
    fn partial_city_selection_restricts() {
        let rows = locations();
        let criteria = FilterCriteria {
            cities: cities(&["Hobbs", "Belen"]),
            ..FilterCriteria::default()
        };
        assert_eq!(
            names(&filter(&rows, &criteria, &known())),
            ["Mesa Buds", "Valley Kind"]
        );
    }

    #[test]
    fn empty_city_selection_matches_nothing() {
        let rows = locations();
        let criteria = FilterCriteria {
            cities: Some(BTreeSet::new()),
            ..FilterCriteria::default()
        };
        assert!(filter(&rows, &criteria, &known()).is_empty());
    }

    #[test]
    fn companies_match_on_any_member_city() {
        let company = |name: &str, member_cities: &[&str], direction| CompanyAggregate {
            company: name.to_string(),
            region: Some("North".to_string()),
            cities: member_cities.iter().map(ToString::to_string).collect(),
            addresses: vec![],
            licensees: vec![],
            location_count: member_cities.len(),
            latest_sales: 0.0,
            avg_monthly_sales: 0.0,
            growth_rate: 0.0,
            trend_direction: direction,
            trend_confidence: None,
            monthly_data: vec![],
        };
        let rows = vec![
            company("Acme", &["Taos", "Hobbs"], TrendDirection::StrongDown),
            company("Solo", &["Belen"], TrendDirection::InsufficientData),
        ];

        let by_city = FilterCriteria {
            cities: cities(&["Hobbs"]),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&filter(&rows, &by_city, &known())), ["Acme"]);

        let by_search = FilterCriteria {
            search: Some("belen".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&filter(&rows, &by_search, &known())), ["Solo"]);

        let stable = FilterCriteria {
            trend: TrendFilter::Stable,
            ..FilterCriteria::default()
        };
        assert_eq!(names(&filter(&rows, &stable, &known())), ["Solo"]);
    }

    #[test]
    fn city_selection_ignores_stray_whitespace() {
        let dataset = SalesDataset {
            locations: vec![
                location("Green Leaf", "Taos ", "North", "up"),
                location("Mesa Buds", "Hobbs", "South", "up"),
            ],
            ..SalesDataset::default()
        };
        let known = dataset.known_cities();
        assert_eq!(known, ["Hobbs", "Taos"]);

        let criteria = FilterCriteria {
            cities: cities(&["Taos"]),
            ..FilterCriteria::default()
        };
        assert_eq!(
            names(&filter(&dataset.locations, &criteria, &known)),
            ["Green Leaf"]
        );
    }

    #[test]
    fn trend_filter_parses_labels() {
        assert_eq!("all".parse::<TrendFilter>().unwrap(), TrendFilter::All);
        assert_eq!("Up".parse::<TrendFilter>().unwrap(), TrendFilter::Up);
        assert!("sideways".parse::<TrendFilter>().is_err());
    }
}
