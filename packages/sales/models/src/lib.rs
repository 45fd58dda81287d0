#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dispensary sales record types.
//!
//! These types mirror the structured documents produced by the upstream
//! sales pipeline: one [`LocationRecord`] per physical retail location,
//! each carrying a series of [`MonthlyPoint`]s, plus the derived
//! [`CompanyAggregate`] rollup. Upstream values are frequently sloppy
//! (numbers encoded as strings, nulls, float-typed ZIP codes), so the
//! numeric fields are captured leniently and validated on access.

pub mod lenient;

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use lenient::{LenientNumber, PostalCode};

/// A finite WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate if both components are finite.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }

    /// Creates a coordinate clamped to the valid latitude/longitude ranges.
    ///
    /// Returns `None` if either component is not finite.
    #[must_use]
    pub fn clamped(lat: f64, lng: f64) -> Option<Self> {
        Self::new(lat.clamp(-90.0, 90.0), lng.clamp(-180.0, 180.0))
    }

    /// Returns this coordinate shifted by the given offsets, clamped.
    #[must_use]
    pub fn offset(self, dlat: f64, dlng: f64) -> Option<Self> {
        Self::clamped(self.lat + dlat, self.lng + dlng)
    }
}

/// One month of sales for a location or company.
///
/// Every field is optional because upstream rows can be missing any of
/// them; use [`MonthlyPoint::month_key`] and [`MonthlyPoint::total`] to
/// read validated values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Zero-padded `YYYY-MM` key.
    #[serde(default)]
    pub month: Option<String>,
    /// Total sales for the month.
    #[serde(default)]
    pub total_sales: Option<LenientNumber>,
    /// Medical-use sales for the month.
    #[serde(default)]
    pub medical_sales: Option<LenientNumber>,
    /// Adult-use sales for the month.
    #[serde(default)]
    pub adult_sales: Option<LenientNumber>,
}

impl MonthlyPoint {
    /// Creates a fully populated point.
    #[must_use]
    pub fn new(month: impl Into<String>, total: f64, medical: f64, adult: f64) -> Self {
        Self {
            month: Some(month.into()),
            total_sales: Some(LenientNumber::Number(total)),
            medical_sales: Some(LenientNumber::Number(medical)),
            adult_sales: Some(LenientNumber::Number(adult)),
        }
    }

    /// Returns the month key if present and non-blank.
    #[must_use]
    pub fn month_key(&self) -> Option<&str> {
        self.month
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Returns the total sales if present and finite.
    #[must_use]
    pub fn total(&self) -> Option<f64> {
        self.total_sales.as_ref().and_then(LenientNumber::value)
    }

    /// Returns the medical sales, treating missing/invalid values as zero.
    #[must_use]
    pub fn medical_or_zero(&self) -> f64 {
        self.medical_sales
            .as_ref()
            .and_then(LenientNumber::value)
            .unwrap_or(0.0)
    }

    /// Returns the adult-use sales, treating missing/invalid values as zero.
    #[must_use]
    pub fn adult_or_zero(&self) -> f64 {
        self.adult_sales
            .as_ref()
            .and_then(LenientNumber::value)
            .unwrap_or(0.0)
    }

    /// A point is usable when it has a month key and a finite total.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.month_key().is_some() && self.total().is_some()
    }
}

/// A validated, borrowed view of a [`MonthlyPoint`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidPoint<'a> {
    /// Month key.
    pub month: &'a str,
    /// Total sales.
    pub total: f64,
    /// Medical sales (zero when missing).
    pub medical: f64,
    /// Adult-use sales (zero when missing).
    pub adult: f64,
}

/// Drops unusable points and sorts the rest ascending by month key.
///
/// Month keys are zero-padded `YYYY-MM`, so lexical order is
/// chronological order.
#[must_use]
pub fn sorted_valid_points(series: &[MonthlyPoint]) -> Vec<ValidPoint<'_>> {
    let mut points: Vec<ValidPoint<'_>> = series
        .iter()
        .filter_map(|p| {
            Some(ValidPoint {
                month: p.month_key()?,
                total: p.total()?,
                medical: p.medical_or_zero(),
                adult: p.adult_or_zero(),
            })
        })
        .collect();
    points.sort_by(|a, b| a.month.cmp(b.month));
    points
}

/// Fine-grained trend classification.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendDirection {
    /// Sales are growing.
    Up,
    /// Sales are growing well beyond the stability threshold.
    StrongUp,
    /// Sales are shrinking.
    Down,
    /// Sales are shrinking well beyond the stability threshold.
    StrongDown,
    /// No significant change.
    Stable,
    /// Not enough usable points to classify.
    InsufficientData,
}

impl TrendDirection {
    /// Collapses this direction into its coarse filtering bucket.
    #[must_use]
    pub const fn bucket(self) -> TrendBucket {
        match self {
            Self::Up | Self::StrongUp => TrendBucket::Up,
            Self::Down | Self::StrongDown => TrendBucket::Down,
            Self::Stable | Self::InsufficientData => TrendBucket::Stable,
        }
    }

    /// Parses an upstream label, falling back to the coarse bucket when the
    /// label is not one of the known fine-grained values.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        label
            .and_then(|l| l.trim().parse().ok())
            .unwrap_or_else(|| TrendBucket::from_label(label).into())
    }
}

/// Coarse three-way trend bucket used for filtering and summary counts.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendBucket {
    /// `up` and `strong_up`.
    Up,
    /// `down` and `strong_down`.
    Down,
    /// `stable` and `insufficient_data`.
    Stable,
}

impl TrendBucket {
    /// Buckets a pre-computed trend label by substring.
    ///
    /// A label containing `"up"` is [`Self::Up`], one containing `"down"`
    /// is [`Self::Down`], and anything else (including no label) is
    /// [`Self::Stable`]. Matching is case-insensitive.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::Stable;
        };
        let label = label.to_lowercase();
        if label.contains("up") {
            Self::Up
        } else if label.contains("down") {
            Self::Down
        } else {
            Self::Stable
        }
    }
}

impl From<TrendBucket> for TrendDirection {
    fn from(bucket: TrendBucket) -> Self {
        match bucket {
            TrendBucket::Up => Self::Up,
            TrendBucket::Down => Self::Down,
            TrendBucket::Stable => Self::Stable,
        }
    }
}

/// How much the trend classification can be trusted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendConfidence {
    /// Six or more months with low volatility.
    High,
    /// Four or more months with moderate volatility.
    Medium,
    /// Anything else.
    Low,
}

/// One physical retail location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Licensee (display) name.
    #[serde(alias = "name")]
    pub licensee: String,
    /// Company identity used for grouping. Falls back to `licensee`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// City name.
    #[serde(default)]
    pub city: String,
    /// Sales region.
    #[serde(default)]
    pub region: Option<String>,
    /// Postal code as delivered upstream.
    #[serde(default)]
    pub zip: Option<PostalCode>,
    /// Explicit latitude, if the upstream pipeline had one.
    #[serde(default)]
    pub latitude: Option<LenientNumber>,
    /// Explicit longitude, if the upstream pipeline had one.
    #[serde(default)]
    pub longitude: Option<LenientNumber>,
    /// Sales for the most recent month.
    #[serde(default)]
    pub latest_sales: f64,
    /// Average monthly sales.
    #[serde(default)]
    pub avg_monthly_sales: f64,
    /// Growth rate in percent.
    #[serde(default)]
    pub growth_rate: f64,
    /// Pre-computed trend label (e.g. `"strong_up"`).
    #[serde(default)]
    pub trend_direction: Option<String>,
    /// Pre-computed confidence label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend_confidence: Option<String>,
    /// Monthly sales series.
    #[serde(default)]
    pub monthly_data: Vec<MonthlyPoint>,
}

impl LocationRecord {
    /// The identity this location is grouped under in the company view.
    #[must_use]
    pub fn company_key(&self) -> &str {
        self.company_name
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.licensee)
    }

    /// Coarse bucket derived from the pre-computed trend label.
    #[must_use]
    pub fn trend_bucket(&self) -> TrendBucket {
        TrendBucket::from_label(self.trend_direction.as_deref())
    }

    /// Explicit coordinates, accepted only when both parse to finite numbers.
    #[must_use]
    pub fn explicit_coordinate(&self) -> Option<Coordinate> {
        let lat = self.latitude.as_ref()?.value()?;
        let lng = self.longitude.as_ref()?.value()?;
        Coordinate::new(lat, lng)
    }
}

/// A company-level rollup of one or more [`LocationRecord`]s.
///
/// Upstream documents name the company under `company`, `company_name`,
/// or `licensee`, often more than one at once. The first non-blank of
/// those, in that order, becomes [`Self::company`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompanyRecord")]
pub struct CompanyAggregate {
    /// Company identity.
    pub company: String,
    /// Dominant region across member locations.
    pub region: Option<String>,
    /// Distinct member cities in order of first appearance.
    pub cities: Vec<String>,
    /// Distinct member addresses in order of first appearance.
    pub addresses: Vec<String>,
    /// Distinct licensee names folded into this company.
    pub licensees: Vec<String>,
    /// Number of member locations.
    pub location_count: usize,
    /// Sum of member latest sales.
    pub latest_sales: f64,
    /// Sum of member average monthly sales.
    pub avg_monthly_sales: f64,
    /// Growth rate in percent, recomputed from the merged series.
    pub growth_rate: f64,
    /// Trend recomputed from the merged series.
    pub trend_direction: TrendDirection,
    /// Confidence of the recomputed trend.
    pub trend_confidence: Option<TrendConfidence>,
    /// Merged monthly series, ascending by month.
    pub monthly_data: Vec<MonthlyPoint>,
}

/// Wire shape of a [`CompanyAggregate`] before the identity keys are merged.
#[derive(Deserialize)]
struct CompanyRecord {
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    licensee: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    cities: Vec<String>,
    #[serde(default)]
    addresses: Vec<String>,
    #[serde(default, alias = "original_licensee_names")]
    licensees: Vec<String>,
    #[serde(default)]
    location_count: usize,
    #[serde(default)]
    latest_sales: f64,
    #[serde(default)]
    avg_monthly_sales: f64,
    #[serde(default)]
    growth_rate: f64,
    #[serde(default = "default_direction", deserialize_with = "deserialize_direction")]
    trend_direction: TrendDirection,
    #[serde(default)]
    trend_confidence: Option<TrendConfidence>,
    #[serde(default)]
    monthly_data: Vec<MonthlyPoint>,
}

impl TryFrom<CompanyRecord> for CompanyAggregate {
    type Error = &'static str;

    fn try_from(record: CompanyRecord) -> Result<Self, Self::Error> {
        let company = [record.company, record.company_name, record.licensee]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .ok_or("company record has no company, company_name, or licensee")?;

        Ok(Self {
            company,
            region: record.region,
            cities: record.cities,
            addresses: record.addresses,
            licensees: record.licensees,
            location_count: record.location_count,
            latest_sales: record.latest_sales,
            avg_monthly_sales: record.avg_monthly_sales,
            growth_rate: record.growth_rate,
            trend_direction: record.trend_direction,
            trend_confidence: record.trend_confidence,
            monthly_data: record.monthly_data,
        })
    }
}

impl CompanyAggregate {
    /// Coarse bucket of the recomputed trend.
    #[must_use]
    pub const fn trend_bucket(&self) -> TrendBucket {
        self.trend_direction.bucket()
    }

    /// Whether this company has a location in any of `cities`.
    #[must_use]
    pub fn serves_any<'a>(&self, mut cities: impl Iterator<Item = &'a str>) -> bool {
        cities.any(|c| self.cities.iter().any(|own| own == c))
    }
}

/// A loaded sales document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesDataset {
    /// When the upstream pipeline produced the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    /// Month keys present in the document, ascending.
    #[serde(default)]
    pub months_covered: Vec<String>,
    /// Known region names, in display order.
    #[serde(default)]
    pub regions: Vec<String>,
    /// Per-location records.
    #[serde(default)]
    pub locations: Vec<LocationRecord>,
    /// Pre-aggregated company rollups, when the document carries them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companies: Option<Vec<CompanyAggregate>>,
}

impl SalesDataset {
    /// Distinct non-blank location cities, sorted.
    #[must_use]
    pub fn known_cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = self
            .locations
            .iter()
            .map(|l| l.city.trim())
            .filter(|c| !c.is_empty())
            .collect();
        cities.sort_unstable();
        cities.dedup();
        cities
    }
}

/// Shared read access to the two row kinds a dashboard view can show.
///
/// Filtering, sorting, and summary statistics work over either
/// [`LocationRecord`]s or [`CompanyAggregate`]s through this trait.
pub trait SalesEntity {
    /// Display name (licensee or company).
    fn name(&self) -> &str;

    /// Sales region, if known.
    fn region(&self) -> Option<&str>;

    /// Cities this row covers: one for a location, all members for a company.
    fn cities(&self) -> Vec<&str>;

    /// Extra text matched by free-text search besides the name.
    fn search_fields(&self) -> Vec<&str>;

    /// Coarse trend bucket.
    fn trend_bucket(&self) -> TrendBucket;

    /// Most recent month's sales.
    fn latest_sales(&self) -> f64;

    /// Average monthly sales.
    fn avg_monthly_sales(&self) -> f64;

    /// Growth rate in percent.
    fn growth_rate(&self) -> f64;

    /// Number of physical locations represented.
    fn location_count(&self) -> usize;

    /// Monthly sales series.
    fn monthly_data(&self) -> &[MonthlyPoint];
}

impl<T: SalesEntity + ?Sized> SalesEntity for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn region(&self) -> Option<&str> {
        (**self).region()
    }

    fn cities(&self) -> Vec<&str> {
        (**self).cities()
    }

    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }

    fn trend_bucket(&self) -> TrendBucket {
        (**self).trend_bucket()
    }

    fn latest_sales(&self) -> f64 {
        (**self).latest_sales()
    }

    fn avg_monthly_sales(&self) -> f64 {
        (**self).avg_monthly_sales()
    }

    fn growth_rate(&self) -> f64 {
        (**self).growth_rate()
    }

    fn location_count(&self) -> usize {
        (**self).location_count()
    }

    fn monthly_data(&self) -> &[MonthlyPoint] {
        (**self).monthly_data()
    }
}

impl SalesEntity for LocationRecord {
    fn name(&self) -> &str {
        &self.licensee
    }

    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn cities(&self) -> Vec<&str> {
        vec![self.city.trim()]
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.address.as_str(), self.city.as_str()]
    }

    fn trend_bucket(&self) -> TrendBucket {
        Self::trend_bucket(self)
    }

    fn latest_sales(&self) -> f64 {
        self.latest_sales
    }

    fn avg_monthly_sales(&self) -> f64 {
        self.avg_monthly_sales
    }

    fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    fn location_count(&self) -> usize {
        1
    }

    fn monthly_data(&self) -> &[MonthlyPoint] {
        &self.monthly_data
    }
}

impl SalesEntity for CompanyAggregate {
    fn name(&self) -> &str {
        &self.company
    }

    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn cities(&self) -> Vec<&str> {
        self.cities.iter().map(String::as_str).collect()
    }

    fn search_fields(&self) -> Vec<&str> {
        self.cities()
    }

    fn trend_bucket(&self) -> TrendBucket {
        Self::trend_bucket(self)
    }

    fn latest_sales(&self) -> f64 {
        self.latest_sales
    }

    fn avg_monthly_sales(&self) -> f64 {
        self.avg_monthly_sales
    }

    fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    fn location_count(&self) -> usize {
        self.location_count
    }

    fn monthly_data(&self) -> &[MonthlyPoint] {
        &self.monthly_data
    }
}

const fn default_direction() -> TrendDirection {
    TrendDirection::InsufficientData
}

fn deserialize_direction<'de, D>(deserializer: D) -> Result<TrendDirection, D::Error>
where
    D: Deserializer<'de>,
{
    let label: Option<String> = Option::deserialize(deserializer)?;
    Ok(label.map_or(TrendDirection::InsufficientData, |l| {
        TrendDirection::from_label(Some(&l))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 1.0).is_none());
        assert!(Coordinate::new(1.0, f64::INFINITY).is_none());
        assert_eq!(
            Coordinate::new(35.0, -106.0),
            Some(Coordinate {
                lat: 35.0,
                lng: -106.0
            })
        );
    }

    #[test]
    fn coordinate_offset_clamps() {
        let c = Coordinate::new(89.999, 179.999).unwrap();
        let shifted = c.offset(0.5, 0.5).unwrap();
        assert!((shifted.lat - 90.0).abs() < f64::EPSILON);
        assert!((shifted.lng - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coarse_bucket_mapping() {
        assert_eq!(TrendDirection::StrongUp.bucket(), TrendBucket::Up);
        assert_eq!(TrendDirection::Up.bucket(), TrendBucket::Up);
        assert_eq!(TrendDirection::StrongDown.bucket(), TrendBucket::Down);
        assert_eq!(TrendDirection::InsufficientData.bucket(), TrendBucket::Stable);
        assert_eq!(TrendDirection::Stable.bucket(), TrendBucket::Stable);
    }

    #[test]
    fn label_bucketing_uses_substrings() {
        assert_eq!(TrendBucket::from_label(Some("strong_up")), TrendBucket::Up);
        assert_eq!(TrendBucket::from_label(Some("up")), TrendBucket::Up);
        assert_eq!(TrendBucket::from_label(Some("strong_down")), TrendBucket::Down);
        assert_eq!(
            TrendBucket::from_label(Some("insufficient_data")),
            TrendBucket::Stable
        );
        assert_eq!(TrendBucket::from_label(None), TrendBucket::Stable);
    }

    #[test]
    fn direction_from_label_prefers_exact_match() {
        assert_eq!(
            TrendDirection::from_label(Some("strong_down")),
            TrendDirection::StrongDown
        );
        assert_eq!(
            TrendDirection::from_label(Some("Trending UP")),
            TrendDirection::Up
        );
        assert_eq!(TrendDirection::from_label(None), TrendDirection::Stable);
    }

    #[test]
    fn sorted_valid_points_drops_and_sorts() {
        let series = vec![
            MonthlyPoint::new("2025-03", 300.0, 0.0, 300.0),
            MonthlyPoint {
                month: None,
                total_sales: Some(LenientNumber::Number(1.0)),
                ..MonthlyPoint::default()
            },
            MonthlyPoint::new("2025-01", 100.0, 50.0, 50.0),
            MonthlyPoint {
                month: Some("2025-02".to_string()),
                total_sales: Some(LenientNumber::Text("n/a".to_string())),
                ..MonthlyPoint::default()
            },
        ];

        let points = sorted_valid_points(&series);
        let months: Vec<&str> = points.iter().map(|p| p.month).collect();
        assert_eq!(months, ["2025-01", "2025-03"]);
        assert!((points[0].medical - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn location_record_parses_sloppy_document() {
        let record: LocationRecord = serde_json::from_value(serde_json::json!({
            "licensee": "GREEN LEAF",
            "address": "123 Main St",
            "city": "Santa Fe",
            "zip": 87501.0,
            "latitude": "35.68",
            "longitude": null,
            "trend_direction": "strong_up",
            "monthly_data": [
                { "month": "2025-01", "total_sales": "1200.50", "medical_sales": null },
                { "month": "2025-02", "total_sales": true }
            ]
        }))
        .unwrap();

        assert_eq!(record.company_key(), "GREEN LEAF");
        assert_eq!(record.trend_bucket(), TrendBucket::Up);
        assert!(record.explicit_coordinate().is_none());
        assert_eq!(record.monthly_data[0].total(), Some(1200.5));
        assert_eq!(record.monthly_data[1].total(), None);
    }

    #[test]
    fn explicit_coordinate_accepts_numeric_strings() {
        let record = LocationRecord {
            latitude: Some(LenientNumber::Text(" 35.5 ".to_string())),
            longitude: Some(LenientNumber::Number(-106.0)),
            ..LocationRecord::default()
        };
        assert_eq!(
            record.explicit_coordinate(),
            Some(Coordinate {
                lat: 35.5,
                lng: -106.0
            })
        );
    }

    #[test]
    fn company_key_prefers_company_name() {
        let record = LocationRecord {
            licensee: "OCC ABQ LLC - COORS BLVD RETAIL".to_string(),
            company_name: Some("OCC ABQ LLC".to_string()),
            ..LocationRecord::default()
        };
        assert_eq!(record.company_key(), "OCC ABQ LLC");
    }

    #[test]
    fn company_aggregate_parses_upstream_labels() {
        let company: CompanyAggregate = serde_json::from_value(serde_json::json!({
            "company_name": "SCORE 420",
            "cities": ["Albuquerque", "Belen"],
            "location_count": 2,
            "trend_direction": "strong_down",
            "trend_confidence": "high"
        }))
        .unwrap();

        assert_eq!(company.company, "SCORE 420");
        assert_eq!(company.trend_direction, TrendDirection::StrongDown);
        assert_eq!(company.trend_bucket(), TrendBucket::Down);
        assert!(company.serves_any(["Belen"].into_iter()));
        assert!(!company.serves_any(["Taos"].into_iter()));
    }

    #[test]
    fn company_aggregate_accepts_repeated_identity_keys() {
        let company: CompanyAggregate = serde_json::from_value(serde_json::json!({
            "licensee": "OCC ABQ LLC",
            "company_name": "OCC ABQ LLC",
            "original_licensee_names": ["OCC ABQ LLC - COORS BLVD RETAIL"],
            "primary_city": "Albuquerque",
            "total_months": 12,
            "first_sales": 900.0
        }))
        .unwrap();
        assert_eq!(company.company, "OCC ABQ LLC");
        assert_eq!(company.licensees, ["OCC ABQ LLC - COORS BLVD RETAIL"]);
        assert_eq!(company.trend_direction, TrendDirection::InsufficientData);

        let company: CompanyAggregate = serde_json::from_value(serde_json::json!({
            "company_name": " ",
            "licensee": "SCORE 420"
        }))
        .unwrap();
        assert_eq!(company.company, "SCORE 420");

        let nameless = serde_json::from_value::<CompanyAggregate>(serde_json::json!({
            "location_count": 2
        }));
        assert!(nameless.is_err());
    }

    #[test]
    fn known_cities_are_sorted_and_distinct() {
        let dataset = SalesDataset {
            locations: ["Taos", "Belen", " Taos ", ""]
                .into_iter()
                .map(|city| LocationRecord {
                    city: city.to_string(),
                    ..LocationRecord::default()
                })
                .collect(),
            ..SalesDataset::default()
        };
        assert_eq!(dataset.known_cities(), ["Belen", "Taos"]);
    }

    #[test]
    fn entities_expose_their_cities() {
        let location = LocationRecord {
            licensee: "A".to_string(),
            city: " Taos ".to_string(),
            ..LocationRecord::default()
        };
        assert_eq!(SalesEntity::cities(&location), ["Taos"]);
        assert_eq!(SalesEntity::location_count(&location), 1);

        let company: CompanyAggregate = serde_json::from_value(serde_json::json!({
            "company": "B",
            "cities": ["Hobbs", "Clovis"],
            "location_count": 2
        }))
        .unwrap();
        assert_eq!(SalesEntity::cities(&company), ["Hobbs", "Clovis"]);
        assert_eq!(SalesEntity::name(&company), "B");
    }
}
