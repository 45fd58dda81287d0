//! Company-level rollups of location records.

use std::collections::BTreeMap;

use dispo_map_sales_models::{CompanyAggregate, LocationRecord, MonthlyPoint, sorted_valid_points};

use crate::trend::{TrendPolicy, classify};

#[derive(Default)]
struct MonthTotals {
    total: f64,
    medical: f64,
    adult: f64,
}

/// Groups location records by [`LocationRecord::company_key`] and builds
/// one [`CompanyAggregate`] per group.
///
/// Output is ordered by company key. Within an aggregate, `cities`,
/// `addresses`, and `licensees` keep the order in which members first
/// mention them. Monthly series are merged by month key; a member with
/// no entry for a month contributes nothing to it.
#[must_use]
pub fn aggregate(records: &[LocationRecord], policy: &TrendPolicy) -> Vec<CompanyAggregate> {
    let mut groups: BTreeMap<&str, Vec<&LocationRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.company_key()).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(company, members)| build(company, &members, policy))
        .collect()
}

fn build(company: &str, members: &[&LocationRecord], policy: &TrendPolicy) -> CompanyAggregate {
    let mut months: BTreeMap<&str, MonthTotals> = BTreeMap::new();
    for member in members {
        for point in sorted_valid_points(&member.monthly_data) {
            let entry = months.entry(point.month).or_default();
            entry.total += point.total;
            entry.medical += point.medical;
            entry.adult += point.adult;
        }
    }

    let monthly_data: Vec<MonthlyPoint> = months
        .into_iter()
        .map(|(month, t)| MonthlyPoint::new(month, t.total, t.medical, t.adult))
        .collect();

    let assessment = classify(&monthly_data, policy);

    CompanyAggregate {
        company: company.to_string(),
        region: dominant_region(members),
        cities: distinct(members.iter().map(|m| m.city.as_str())),
        addresses: distinct(members.iter().map(|m| m.address.as_str())),
        licensees: distinct(members.iter().map(|m| m.licensee.as_str())),
        location_count: members.len(),
        latest_sales: finite_sum(members.iter().map(|m| m.latest_sales)),
        avg_monthly_sales: finite_sum(members.iter().map(|m| m.avg_monthly_sales)),
        growth_rate: assessment.growth_rate,
        trend_direction: assessment.direction,
        trend_confidence: Some(assessment.confidence),
        monthly_data,
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        if !out.iter().any(|existing| existing == value) {
            out.push(value.to_string());
        }
    }
    out
}

fn finite_sum(values: impl Iterator<Item = f64>) -> f64 {
    values.filter(|v| v.is_finite()).sum()
}

/// Most frequent non-blank member region; ties go to the region seen first.
fn dominant_region(members: &[&LocationRecord]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for region in members
        .iter()
        .filter_map(|m| m.region.as_deref())
        .map(str::trim)
        .filter(|r| !r.is_empty())
    {
        match counts.iter_mut().find(|(name, _)| *name == region) {
            Some((_, count)) => *count += 1,
            None => counts.push((region, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (region, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((region, count));
        }
    }
    best.map(|(region, _)| region.to_string())
}
