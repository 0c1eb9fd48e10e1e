use crate::domain::model::{GeographicDistribution, Normalized, RegionObservation, RegionShare};
use crate::utils::error::{Result, StatsError};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Rescales one (university, year) set of raw region shares to percentages
/// summing to 100.
///
/// Regions are ordered by descending applicant count, ties by ascending
/// region id. A zero, negative or non-finite total is an `InvalidDistribution`.
pub fn normalize_scope(
    university_id: &str,
    year: i32,
    observations: Vec<RegionObservation>,
) -> Result<GeographicDistribution> {
    if let Some(bad) = observations
        .iter()
        .find(|o| !o.raw_share.is_finite() || o.raw_share < 0.0)
    {
        return Err(StatsError::invalid_distribution(
            university_id,
            year,
            format!("region '{}' has raw share {}", bad.region_id, bad.raw_share),
        ));
    }

    let total_raw: f64 = observations.iter().map(|o| o.raw_share).sum();
    if !total_raw.is_finite() || total_raw <= 0.0 {
        return Err(StatsError::invalid_distribution(
            university_id,
            year,
            format!(
                "total raw share is {} over {} regions",
                total_raw,
                observations.len()
            ),
        ));
    }

    let mut region_data: Vec<RegionShare> = observations
        .into_iter()
        .map(|o| RegionShare {
            percentage: o.raw_share / total_raw * 100.0,
            region_id: o.region_id,
            region_name: o.region_name,
            applicant_count: o.applicant_count,
        })
        .collect();

    region_data.sort_by(compare_regions);

    Ok(GeographicDistribution {
        university_id: university_id.to_string(),
        year,
        region_data,
    })
}

fn compare_regions(a: &RegionShare, b: &RegionShare) -> Ordering {
    b.applicant_count
        .cmp(&a.applicant_count)
        .then_with(|| a.region_id.cmp(&b.region_id))
}

/// Normalizes every year found for `university_id`, ascending by year.
///
/// Observations for other universities are ignored. A year whose shares
/// cannot be normalized is reported in `failures`; the other years are
/// still returned.
pub fn normalize_by_year(
    university_id: &str,
    observations: Vec<RegionObservation>,
) -> Normalized<GeographicDistribution> {
    let mut by_year: BTreeMap<i32, Vec<RegionObservation>> = BTreeMap::new();
    for observation in observations
        .into_iter()
        .filter(|o| o.university_id == university_id)
    {
        by_year.entry(observation.year).or_default().push(observation);
    }

    let mut result = Normalized::default();
    for (year, group) in by_year {
        match normalize_scope(university_id, year, group) {
            Ok(distribution) => result.items.push(distribution),
            Err(e) => {
                tracing::warn!("Skipping geographic distribution: {}", e);
                result.failures.push(e);
            }
        }
    }
    result
}
