use crate::domain::model::{ProgramYearRecord, RawGenderScope, Region, RegionObservation, University};
use crate::domain::ports::DataProvider;
use crate::utils::error::{Result, StatsError};
use async_trait::async_trait;

/// Answers from `primary`, switching to `fallback` when the primary reports
/// `ProviderUnavailable`. Any other error is returned as is.
///
/// The substitution is visible only as a `warn!` event; the result shape
/// is the same whichever source answered.
pub struct FailoverProvider<P: DataProvider, F: DataProvider> {
    primary: P,
    fallback: F,
}

impl<P: DataProvider, F: DataProvider> FailoverProvider<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    fn should_fall_back(&self, operation: &str, error: &StatsError) -> bool {
        if !error.is_provider_unavailable() {
            return false;
        }
        tracing::warn!(
            operation,
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            "Primary data provider unavailable, substituting fallback data: {}",
            error
        );
        true
    }
}

#[async_trait]
impl<P: DataProvider, F: DataProvider> DataProvider for FailoverProvider<P, F> {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn fetch_universities(&self) -> Result<Vec<University>> {
        match self.primary.fetch_universities().await {
            Err(e) if self.should_fall_back("fetch_universities", &e) => {
                self.fallback.fetch_universities().await
            }
            other => other,
        }
    }

    async fn fetch_regions(&self) -> Result<Vec<Region>> {
        match self.primary.fetch_regions().await {
            Err(e) if self.should_fall_back("fetch_regions", &e) => {
                self.fallback.fetch_regions().await
            }
            other => other,
        }
    }

    async fn fetch_programs(&self, university_id: Option<&str>) -> Result<Vec<ProgramYearRecord>> {
        match self.primary.fetch_programs(university_id).await {
            Err(e) if self.should_fall_back("fetch_programs", &e) => {
                self.fallback.fetch_programs(university_id).await
            }
            other => other,
        }
    }

    async fn fetch_region_shares(
        &self,
        university_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<RegionObservation>> {
        match self.primary.fetch_region_shares(university_id, year).await {
            Err(e) if self.should_fall_back("fetch_region_shares", &e) => {
                self.fallback.fetch_region_shares(university_id, year).await
            }
            other => other,
        }
    }

    async fn fetch_gender_raw(&self, university_id: &str) -> Result<Vec<RawGenderScope>> {
        match self.primary.fetch_gender_raw(university_id).await {
            Err(e) if self.should_fall_back("fetch_gender_raw", &e) => {
                self.fallback.fetch_gender_raw(university_id).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fallback::FallbackProvider;
    use crate::adapters::synthetic::Dataset;

    enum Failure {
        Unavailable,
        Config,
    }

    struct BrokenProvider {
        failure: Failure,
    }

    impl BrokenProvider {
        fn fail<T>(&self) -> Result<T> {
            Err(match self.failure {
                Failure::Unavailable => StatsError::provider_unavailable("uhr", "connection refused"),
                Failure::Config => StatsError::ConfigError {
                    message: "bad endpoint".to_string(),
                },
            })
        }
    }

    #[async_trait]
    impl DataProvider for BrokenProvider {
        fn name(&self) -> &str {
            "broken"
        }

        async fn fetch_universities(&self) -> Result<Vec<University>> {
            self.fail()
        }

        async fn fetch_regions(&self) -> Result<Vec<Region>> {
            self.fail()
        }

        async fn fetch_programs(&self, _university_id: Option<&str>) -> Result<Vec<ProgramYearRecord>> {
            self.fail()
        }

        async fn fetch_region_shares(
            &self,
            _university_id: &str,
            _year: Option<i32>,
        ) -> Result<Vec<RegionObservation>> {
            self.fail()
        }

        async fn fetch_gender_raw(&self, _university_id: &str) -> Result<Vec<RawGenderScope>> {
            self.fail()
        }
    }

    #[tokio::test]
    async fn test_unavailable_primary_uses_fallback() {
        let fallback = FallbackProvider::seeded(5);
        let expected = fallback.dataset().clone();
        let provider = FailoverProvider::new(
            BrokenProvider {
                failure: Failure::Unavailable,
            },
            fallback,
        );

        let programs = provider.fetch_programs(Some("kth")).await.unwrap();
        assert_eq!(
            programs.len(),
            expected.programs.iter().filter(|p| p.university_id == "kth").count()
        );
        assert_eq!(provider.fetch_regions().await.unwrap(), expected.regions);
        assert_eq!(provider.fetch_gender_raw("su").await.unwrap().len(), 14 * 4);
        assert_eq!(
            provider.fetch_region_shares("su", Some(2020)).await.unwrap().len(),
            21
        );
    }

    #[tokio::test]
    async fn test_other_errors_are_not_masked() {
        let provider = FailoverProvider::new(
            BrokenProvider {
                failure: Failure::Config,
            },
            FallbackProvider::new(Dataset::default()),
        );

        let err = provider.fetch_universities().await.unwrap_err();
        assert!(matches!(err, StatsError::ConfigError { .. }));
    }

    #[tokio::test]
    async fn test_healthy_primary_is_preferred() {
        let primary = FallbackProvider::seeded(1);
        let expected = primary.dataset().universities.clone();
        let provider = FailoverProvider::new(primary, FallbackProvider::new(Dataset::default()));

        assert_eq!(provider.fetch_universities().await.unwrap(), expected);
    }
}
