use crate::domain::model::{ProgramYearRecord, RawGenderScope, Region, RegionObservation, University};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of raw admission data.
///
/// Implementations only fetch; filtering, aggregation and normalization
/// happen in `core`. Arguments are hints a provider may use to narrow the
/// request, callers still filter the returned records themselves.
#[async_trait]
pub trait DataProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_universities(&self) -> Result<Vec<University>>;

    async fn fetch_regions(&self) -> Result<Vec<Region>>;

    async fn fetch_programs(&self, university_id: Option<&str>) -> Result<Vec<ProgramYearRecord>>;

    async fn fetch_region_shares(
        &self,
        university_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<RegionObservation>>;

    async fn fetch_gender_raw(&self, university_id: &str) -> Result<Vec<RawGenderScope>>;
}

#[async_trait]
impl<T: DataProvider + ?Sized> DataProvider for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_universities(&self) -> Result<Vec<University>> {
        (**self).fetch_universities().await
    }

    async fn fetch_regions(&self) -> Result<Vec<Region>> {
        (**self).fetch_regions().await
    }

    async fn fetch_programs(&self, university_id: Option<&str>) -> Result<Vec<ProgramYearRecord>> {
        (**self).fetch_programs(university_id).await
    }

    async fn fetch_region_shares(
        &self,
        university_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<RegionObservation>> {
        (**self).fetch_region_shares(university_id, year).await
    }

    async fn fetch_gender_raw(&self, university_id: &str) -> Result<Vec<RawGenderScope>> {
        (**self).fetch_gender_raw(university_id).await
    }
}

pub trait ConfigProvider: Send + Sync {
    fn uhr_endpoint(&self) -> &str;
    fn scb_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout_secs(&self) -> u64;
    fn fallback_enabled(&self) -> bool;
    fn fallback_seed(&self) -> u64;
    fn bind_address(&self) -> &str;
    fn is_development(&self) -> bool;
}
