//! Sales document loading.
//!
//! Two document shapes are accepted. The current shape is an object with a
//! `locations` collection (either a bare array or `{ "data": [...] }`) and
//! optional `companies`, `regions`, `months_covered`, and `generated_at`.
//! Older documents carry a flat `dispensaries` array, or are just a
//! top-level array of records.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use dispo_map_geography_models::regions::{all_regions_with_other, region_for_city};
use dispo_map_sales_models::{CompanyAggregate, LocationRecord, SalesDataset};
use serde::Deserialize;

use crate::IngestError;
use crate::company::normalize_company_name;

#[derive(Deserialize)]
#[serde(untagged)]
enum Collection<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Collection<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

#[derive(Deserialize)]
struct SalesDocument {
    #[serde(default)]
    generated_at: Option<String>,
    #[serde(default)]
    months_covered: Vec<String>,
    #[serde(default)]
    regions: Option<Vec<String>>,
    #[serde(default)]
    locations: Option<Collection<LocationRecord>>,
    #[serde(default)]
    companies: Option<Collection<CompanyAggregate>>,
    #[serde(default)]
    dispensaries: Option<Vec<LocationRecord>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Object(Box<SalesDocument>),
    Records(Vec<LocationRecord>),
}

/// Reads and parses a sales document from disk.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read, is not a valid
/// sales document, or has no location records.
pub fn load_dataset(path: &Path) -> Result<SalesDataset, IngestError> {
    let json = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&json)?;
    log::info!("Loaded sales document from {}", path.display());
    Ok(dataset)
}

/// Parses a sales document and fills in derived fields.
///
/// Locations without a region get one from their city, locations without
/// a company name get one derived from the licensee, and a missing region
/// list or month list is rebuilt from the records.
///
/// # Errors
///
/// Returns [`IngestError::Json`] if the document does not match either
/// shape and [`IngestError::MissingLocations`] if it has no records.
pub fn parse_dataset(json: &str) -> Result<SalesDataset, IngestError> {
    let document = match serde_json::from_str::<Document>(json)? {
        Document::Object(document) => *document,
        Document::Records(records) => SalesDocument {
            generated_at: None,
            months_covered: Vec::new(),
            regions: None,
            locations: None,
            companies: None,
            dispensaries: Some(records),
        },
    };

    let mut locations = document
        .locations
        .map(Collection::into_vec)
        .or(document.dispensaries)
        .ok_or(IngestError::MissingLocations)?;
    if locations.is_empty() {
        return Err(IngestError::MissingLocations);
    }

    for location in &mut locations {
        fill_location(location);
    }

    let regions = document.regions.unwrap_or_else(|| {
        all_regions_with_other()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    });

    let months_covered = if document.months_covered.is_empty() {
        months_in(&locations)
    } else {
        document.months_covered
    };

    let malformed = months_covered
        .iter()
        .filter(|m| parse_month(m).is_none())
        .count();
    if malformed > 0 {
        log::warn!("{malformed} month keys are not in YYYY-MM form");
    }

    let dataset = SalesDataset {
        generated_at: document.generated_at,
        months_covered,
        regions,
        locations,
        companies: document.companies.map(Collection::into_vec),
    };

    log::info!(
        "Sales document: {} locations, {} companies, {} regions, {} months{}",
        dataset.locations.len(),
        dataset
            .companies
            .as_ref()
            .map_or_else(|| "computed".to_string(), |c| c.len().to_string()),
        dataset.regions.len(),
        dataset.months_covered.len(),
        generated_at(&dataset)
            .map(|at| format!(", generated {at}"))
            .unwrap_or_default()
    );

    Ok(dataset)
}

fn fill_location(location: &mut LocationRecord) {
    let city = location.city.trim();
    if city.len() != location.city.len() {
        location.city = city.to_string();
    }

    if location
        .region
        .as_deref()
        .is_none_or(|r| r.trim().is_empty())
    {
        location.region = Some(region_for_city(&location.city).to_string());
    }

    if location
        .company_name
        .as_deref()
        .is_none_or(|c| c.trim().is_empty())
    {
        location.company_name = Some(normalize_company_name(&location.licensee));
    }
}

fn months_in(locations: &[LocationRecord]) -> Vec<String> {
    locations
        .iter()
        .flat_map(|l| l.monthly_data.iter())
        .filter(|p| p.is_valid())
        .filter_map(|p| p.month_key())
        .map(ToString::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Parses a `YYYY-MM` month key to the first day of the month.
#[must_use]
pub fn parse_month(month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d").ok()
}

/// The document's generation timestamp, if present and parseable.
#[must_use]
pub fn generated_at(dataset: &SalesDataset) -> Option<NaiveDateTime> {
    let raw = dataset.generated_at.as_deref()?.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use dispo_map_sales_models::TrendDirection;
    use serde_json::json;

    use super::*;

    fn record(licensee: &str, city: &str) -> serde_json::Value {
        json!({
            "licensee": licensee,
            "address": "1 Main St",
            "city": city,
            "zip": 87501,
            "latest_sales": 1000,
            "avg_monthly_sales": 900.5,
            "trend_direction": "up",
            "monthly_data": [
                { "month": "2024-02", "total_sales": "1000", "medical_sales": null, "adult_sales": 1000 },
                { "month": "2024-01", "total_sales": 800, "medical_sales": 100, "adult_sales": 700 },
                { "month": null, "total_sales": 5 }
            ]
        })
    }

    #[test]
    fn parses_current_shape_with_wrapped_collections() {
        let doc = json!({
            "generated_at": "2025-01-05T12:34:56.123456",
            "months_covered": ["2024-01", "2024-02"],
            "regions": ["Northern New Mexico", "Other"],
            "locations": { "data": [record("GREEN LEAF - CERRILLOS RETAIL", "Santa Fe")] },
            "companies": { "data": [{
                "company": "GREEN LEAF",
                "cities": ["Santa Fe"],
                "location_count": 1,
                "trend_direction": "strong_up"
            }] }
        });

        let dataset = parse_dataset(&doc.to_string()).unwrap();
        assert_eq!(dataset.locations.len(), 1);
        assert_eq!(dataset.regions, ["Northern New Mexico", "Other"]);
        assert_eq!(dataset.months_covered, ["2024-01", "2024-02"]);

        let companies = dataset.companies.as_ref().unwrap();
        assert_eq!(companies[0].trend_direction, TrendDirection::StrongUp);

        let location = &dataset.locations[0];
        assert_eq!(location.company_name.as_deref(), Some("GREEN LEAF"));
        assert_eq!(location.region.as_deref(), Some("Northern New Mexico"));

        let at = generated_at(&dataset).unwrap();
        assert_eq!(at.to_string(), "2025-01-05 12:34:56.123456");
    }

    fn pipeline_location(licensee: &str, city: &str, region: &str) -> serde_json::Value {
        json!({
            "licensee": licensee,
            "city": city,
            "region": region,
            "address": "4100 COORS BLVD NW",
            "zip": 87120.0,
            "latitude": null,
            "longitude": null,
            "trend_direction": "strong_up",
            "trend_confidence": "high",
            "avg_monthly_sales": 41_250.5,
            "total_months": 2,
            "latest_sales": 45_000.0,
            "first_sales": 37_501.0,
            "growth_rate": 19.99,
            "monthly_data": [
                { "month": "2024-01", "total_sales": 37_501.0, "medical_sales": 1_200.0, "adult_sales": 36_301.0 },
                { "month": "2024-02", "total_sales": 45_000.0, "medical_sales": 1_500.0, "adult_sales": 43_500.0 }
            ]
        })
    }

    #[test]
    fn parses_full_pipeline_document() {
        let locations = vec![
            pipeline_location(
                "OCC ABQ LLC - COORS BLVD RETAIL - Albuquerque",
                "Albuquerque",
                "Central New Mexico",
            ),
            pipeline_location(
                "URBAN WELLNESS - 4TH ST RETAIL",
                "Albuquerque ",
                "Central New Mexico",
            ),
        ];
        let regional = json!({
            "Central New Mexico": {
                "total_dispensaries": 2,
                "trending_up": 0,
                "trending_down": 0,
                "stable": 0,
                "total_monthly_sales": 82_501.0
            }
        });
        let doc = json!({
            "generated_at": "2025-01-05T12:34:56.123456",
            "months_covered": ["2024-01", "2024-02"],
            "regions": [
                "Northern New Mexico",
                "Central New Mexico",
                "Southern New Mexico",
                "Western New Mexico",
                "Eastern New Mexico",
                "Other"
            ],
            "locations": {
                "total_dispensaries": 2,
                "regional_stats": regional,
                "data": locations
            },
            "companies": {
                "total_companies": 1,
                "regional_stats": {
                    "Central New Mexico": {
                        "total_companies": 1,
                        "trending_up": 0,
                        "trending_down": 0,
                        "stable": 0,
                        "total_monthly_sales": 41_250.5
                    }
                },
                "data": [{
                    "licensee": "OCC ABQ LLC",
                    "company_name": "OCC ABQ LLC",
                    "original_licensee_names": ["OCC ABQ LLC - COORS BLVD RETAIL"],
                    "location_count": 1,
                    "cities": ["Albuquerque"],
                    "primary_city": "Albuquerque",
                    "region": "Central New Mexico",
                    "addresses": ["4100 COORS BLVD NW"],
                    "trend_direction": "strong_up",
                    "trend_confidence": "high",
                    "avg_monthly_sales": 41_250.5,
                    "total_months": 2,
                    "latest_sales": 45_000.0,
                    "first_sales": 37_501.0,
                    "growth_rate": 19.99,
                    "monthly_data": [
                        { "month": "2024-01", "total_sales": 37_501.0, "medical_sales": 1_200.0, "adult_sales": 36_301.0 },
                        { "month": "2024-02", "total_sales": 45_000.0, "medical_sales": 1_500.0, "adult_sales": 43_500.0 }
                    ]
                }]
            },
            "total_dispensaries": 2,
            "regional_stats": regional,
            "dispensaries": locations
        });

        let dataset = parse_dataset(&doc.to_string()).unwrap();
        assert_eq!(dataset.locations.len(), 2);
        assert_eq!(dataset.regions.len(), 6);
        assert_eq!(dataset.months_covered, ["2024-01", "2024-02"]);
        assert_eq!(dataset.locations[1].city, "Albuquerque");
        assert_eq!(dataset.known_cities(), ["Albuquerque"]);
        assert_eq!(
            dataset.locations[0].company_name.as_deref(),
            Some("OCC ABQ LLC")
        );

        let companies = dataset.companies.as_ref().unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].company, "OCC ABQ LLC");
        assert_eq!(companies[0].licensees, ["OCC ABQ LLC - COORS BLVD RETAIL"]);
        assert_eq!(companies[0].trend_direction, TrendDirection::StrongUp);
        assert_eq!(companies[0].monthly_data.len(), 2);
    }

    #[test]
    fn parses_bare_locations_array() {
        let doc = json!({ "locations": [record("A", "Taos")] });
        let dataset = parse_dataset(&doc.to_string()).unwrap();
        assert_eq!(dataset.locations.len(), 1);
        assert!(dataset.companies.is_none());
    }

    #[test]
    fn falls_back_to_legacy_shapes() {
        let legacy = json!({ "dispensaries": [record("A", "Taos"), record("B", "Hobbs")] });
        assert_eq!(parse_dataset(&legacy.to_string()).unwrap().locations.len(), 2);

        let bare = json!([record("A", "Taos")]);
        let dataset = parse_dataset(&bare.to_string()).unwrap();
        assert_eq!(dataset.locations.len(), 1);
        assert_eq!(dataset.regions.last().map(String::as_str), Some("Other"));
    }

    #[test]
    fn derives_months_when_missing() {
        let doc = json!({ "locations": [record("A", "Taos")] });
        let dataset = parse_dataset(&doc.to_string()).unwrap();
        assert_eq!(dataset.months_covered, ["2024-01", "2024-02"]);
    }

    #[test]
    fn keeps_explicit_region_and_company() {
        let mut value = record("GREEN LEAF - TAOS", "Taos");
        value["region"] = json!("Custom");
        value["company_name"] = json!("Leaf Holdings");
        let dataset = parse_dataset(&json!({ "locations": [value] }).to_string()).unwrap();

        let location = &dataset.locations[0];
        assert_eq!(location.region.as_deref(), Some("Custom"));
        assert_eq!(location.company_name.as_deref(), Some("Leaf Holdings"));
    }

    #[test]
    fn missing_locations_is_an_error() {
        assert!(matches!(
            parse_dataset(r#"{ "regions": [] }"#),
            Err(IngestError::MissingLocations)
        ));
        assert!(matches!(
            parse_dataset(r#"{ "locations": [] }"#),
            Err(IngestError::MissingLocations)
        ));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(parse_dataset("not json"), Err(IngestError::Json(_))));
        assert!(matches!(parse_dataset("42"), Err(IngestError::Json(_))));
    }

    #[test]
    fn month_keys() {
        assert_eq!(parse_month("2024-03"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(parse_month("March 2024").is_none());
    }
}
