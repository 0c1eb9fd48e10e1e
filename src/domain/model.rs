use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

/// Admission figures for one program in one year.
///
/// `program_id` is the composite `"{program}-{year}"` key. Upstream feeds
/// name the identity fields `id`/`name`, hence the aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramYearRecord {
    #[serde(alias = "id")]
    pub program_id: String,
    #[serde(alias = "name")]
    pub program_name: String,
    pub university_id: String,
    pub year: i32,
    pub applicants: u64,
    pub accepted_students: u64,
    pub first_hand_applicants: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityYearAggregate {
    pub university_id: String,
    pub year: i32,
    pub total_applicants: u64,
    pub total_accepted_students: u64,
    pub programs: Vec<ProgramYearRecord>,
}

/// Un-normalized applicant share of one region for a (university, year).
///
/// `raw_share` may be a count or a provisional percentage; only its
/// proportion to the other regions of the same scope matters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionObservation {
    pub university_id: String,
    pub year: i32,
    pub region_id: String,
    pub region_name: String,
    pub applicant_count: u64,
    pub raw_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionShare {
    pub region_id: String,
    pub region_name: String,
    pub applicant_count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicDistribution {
    pub university_id: String,
    pub year: i32,
    pub region_data: Vec<RegionShare>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenderRatios {
    pub male: f64,
    pub female: f64,
    pub other: f64,
}

impl GenderRatios {
    pub fn new(male: f64, female: f64, other: f64) -> Self {
        Self { male, female, other }
    }

    pub fn sum(&self) -> f64 {
        self.male + self.female + self.other
    }
}

/// Raw gender input for one scope. `program_id == None` is the university-wide total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGenderScope {
    pub university_id: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    pub ratios: GenderRatios,
    pub total_applicants: u64,
    pub total_accepted: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderSplit {
    pub university_id: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    pub male_applicants: u64,
    pub female_applicants: u64,
    pub other_applicants: u64,
    pub male_accepted: u64,
    pub female_accepted: u64,
    pub other_accepted: u64,
}

impl GenderSplit {
    pub fn total_applicants(&self) -> u64 {
        self.male_applicants + self.female_applicants + self.other_applicants
    }

    pub fn total_accepted(&self) -> u64 {
        self.male_accepted + self.female_accepted + self.other_accepted
    }

    /// True when no program is named; an empty program id counts as none.
    pub fn is_university_total(&self) -> bool {
        self.program_id.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsFilter {
    #[serde(default)]
    pub university_id: Option<String>,
    #[serde(default)]
    pub from_year: Option<i32>,
    #[serde(default)]
    pub to_year: Option<i32>,
    /// Prefix of the program identity, e.g. `"kth-cs"`.
    #[serde(default)]
    pub program_id: Option<String>,
}

/// Results of a per-scope computation: scopes that succeeded and the
/// failures of those that did not.
#[derive(Debug)]
pub struct Normalized<T> {
    pub items: Vec<T>,
    pub failures: Vec<crate::utils::error::StatsError>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> Normalized<T> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Succeeds unless every scope failed.
    pub fn into_result(mut self) -> crate::utils::error::Result<Vec<T>> {
        if self.items.is_empty() && !self.failures.is_empty() {
            return Err(self.failures.remove(0));
        }
        Ok(self.items)
    }
}
