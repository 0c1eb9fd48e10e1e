use crate::adapters::synthetic::Dataset;
use crate::domain::model::{ProgramYearRecord, RawGenderScope, Region, RegionObservation, University};
use crate::domain::ports::DataProvider;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Serves a `Dataset` from memory.
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    dataset: Dataset,
}

impl FallbackProvider {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn seeded(seed: u64) -> Self {
        tracing::debug!("Generating synthetic dataset with seed {}", seed);
        Self::new(Dataset::generate(seed))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

#[async_trait]
impl DataProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn fetch_universities(&self) -> Result<Vec<University>> {
        Ok(self.dataset.universities.clone())
    }

    async fn fetch_regions(&self) -> Result<Vec<Region>> {
        Ok(self.dataset.regions.clone())
    }

    async fn fetch_programs(&self, university_id: Option<&str>) -> Result<Vec<ProgramYearRecord>> {
        Ok(self
            .dataset
            .programs
            .iter()
            .filter(|p| university_id.map_or(true, |id| p.university_id == id))
            .cloned()
            .collect())
    }

    async fn fetch_region_shares(
        &self,
        university_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<RegionObservation>> {
        Ok(self
            .dataset
            .region_observations
            .iter()
            .filter(|o| o.university_id == university_id)
            .filter(|o| year.map_or(true, |y| o.year == y))
            .cloned()
            .collect())
    }

    async fn fetch_gender_raw(&self, university_id: &str) -> Result<Vec<RawGenderScope>> {
        Ok(self
            .dataset
            .gender_scopes
            .iter()
            .filter(|s| s.university_id == university_id)
            .cloned()
            .collect())
    }
}
