use crate::domain::model::{ProgramYearRecord, StatisticsFilter};

impl StatisticsFilter {
    pub fn for_university(university_id: &str) -> Self {
        Self {
            university_id: Some(university_id.to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.university_id.is_none()
            && self.from_year.is_none()
            && self.to_year.is_none()
            && self.program_id.is_none()
    }

    /// All set predicates ANDed; unset ones are ignored.
    pub fn matches(&self, record: &ProgramYearRecord) -> bool {
        if let Some(university_id) = &self.university_id {
            if record.university_id != *university_id {
                return false;
            }
        }

        if let Some(from_year) = self.from_year {
            if record.year < from_year {
                return false;
            }
        }

        if let Some(to_year) = self.to_year {
            if record.year > to_year {
                return false;
            }
        }

        // Callers pass a program family ("kth-cs"), not a full record id.
        if let Some(prefix) = &self.program_id {
            if !record.program_id.starts_with(prefix.as_str()) {
                return false;
            }
        }

        true
    }
}

/// Keeps the records matching `filter`, preserving input order.
pub fn filter_records(
    records: impl IntoIterator<Item = ProgramYearRecord>,
    filter: &StatisticsFilter,
) -> Vec<ProgramYearRecord> {
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
