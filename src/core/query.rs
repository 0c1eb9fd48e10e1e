use crate::core::{aggregator, filter, gender, geographic};
use crate::domain::model::{
    GenderSplit, GeographicDistribution, Normalized, ProgramYearRecord, Region, StatisticsFilter,
    University, UniversityYearAggregate,
};
use crate::domain::ports::DataProvider;
use crate::utils::error::Result;

/// Query facade over a `DataProvider`.
///
/// Every call fetches afresh; nothing is cached between queries.
pub struct StatisticsService<P: DataProvider> {
    provider: P,
}

impl<P: DataProvider> StatisticsService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn universities(&self) -> Result<Vec<University>> {
        self.provider.fetch_universities().await
    }

    pub async fn regions(&self) -> Result<Vec<Region>> {
        self.provider.fetch_regions().await
    }

    pub async fn list_statistics(&self, filter: &StatisticsFilter) -> Result<Vec<ProgramYearRecord>> {
        tracing::debug!(?filter, "Listing program statistics");
        let records = self
            .provider
            .fetch_programs(filter.university_id.as_deref())
            .await?;
        let fetched = records.len();

        let selected = filter::filter_records(records, filter);
        tracing::debug!("Selected {} of {} program records", selected.len(), fetched);
        Ok(selected)
    }

    pub async fn university_statistics(
        &self,
        university_id: &str,
    ) -> Result<Vec<UniversityYearAggregate>> {
        let records = self
            .list_statistics(&StatisticsFilter::for_university(university_id))
            .await?;

        let aggregates = aggregator::aggregate_by_year(university_id, records)?;
        tracing::debug!(
            university_id,
            "Aggregated {} years of statistics",
            aggregates.len()
        );
        Ok(aggregates)
    }

    pub async fn geographic_distribution(
        &self,
        university_id: &str,
        year: Option<i32>,
    ) -> Result<Normalized<GeographicDistribution>> {
        let mut observations = self
            .provider
            .fetch_region_shares(university_id, year)
            .await?;
        if let Some(year) = year {
            observations.retain(|o| o.year == year);
        }

        let result = geographic::normalize_by_year(university_id, observations);
        tracing::debug!(
            university_id,
            ?year,
            "Normalized {} geographic distributions ({} failed)",
            result.items.len(),
            result.failures.len()
        );
        Ok(result)
    }

    pub async fn gender_distribution(
        &self,
        university_id: &str,
        year: Option<i32>,
        program_id: Option<&str>,
    ) -> Result<Normalized<GenderSplit>> {
        let raw_scopes = self.provider.fetch_gender_raw(university_id).await?;

        let result = gender::normalize_scopes(university_id, raw_scopes, year, program_id);
        tracing::debug!(
            university_id,
            ?year,
            ?program_id,
            "Normalized {} gender splits ({} failed)",
            result.items.len(),
            result.failures.len()
        );
        Ok(result)
    }
}
