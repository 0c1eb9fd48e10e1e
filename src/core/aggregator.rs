use crate::domain::model::{ProgramYearRecord, UniversityYearAggregate};
use crate::utils::error::{Result, StatsError};
use std::collections::BTreeMap;

/// Groups one university's program records by year and totals them.
///
/// Records must already be scoped to `university_id`; a record from any
/// other university is rejected with `ScopeMismatch`. Output is ascending
/// by year, empty input gives an empty result.
pub fn aggregate_by_year(
    university_id: &str,
    records: Vec<ProgramYearRecord>,
) -> Result<Vec<UniversityYearAggregate>> {
    if let Some(stray) = records.iter().find(|r| r.university_id != university_id) {
        return Err(StatsError::ScopeMismatch {
            expected: university_id.to_string(),
            found: stray.university_id.clone(),
        });
    }

    let mut by_year: BTreeMap<i32, Vec<ProgramYearRecord>> = BTreeMap::new();
    for record in records {
        by_year.entry(record.year).or_default().push(record);
    }

    let aggregates = by_year
        .into_iter()
        .map(|(year, programs)| {
            let total_applicants = programs.iter().map(|p| p.applicants).sum();
            let total_accepted_students = programs.iter().map(|p| p.accepted_students).sum();

            UniversityYearAggregate {
                university_id: university_id.to_string(),
                year,
                total_applicants,
                total_accepted_students,
                programs,
            }
        })
        .collect();

    Ok(aggregates)
}
