use crate::domain::model::{ProgramYearRecord, RawGenderScope, Region, RegionObservation, University};
use crate::domain::ports::{ConfigProvider, DataProvider};
use crate::utils::error::{Result, StatsError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

const UHR: &str = "uhr";
const SCB: &str = "scb";

/// Population table used to enumerate the regions.
const SCB_REGION_TABLE: [&str; 4] = ["BE", "BE0101", "BE0101A", "BefolkningNy"];

/// UHR responses wrap their payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct ScbQuery {
    query: Vec<ScbSelection>,
    response: ScbFormat,
}

#[derive(Debug, Serialize)]
struct ScbSelection {
    code: String,
    selection: ScbFilter,
}

#[derive(Debug, Serialize)]
struct ScbFilter {
    filter: String,
    values: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ScbFormat {
    format: String,
}

#[derive(Debug, Deserialize)]
struct ScbResponse {
    data: Vec<ScbRow>,
}

#[derive(Debug, Deserialize)]
struct ScbRow {
    key: Vec<String>,
}

impl ScbQuery {
    fn all_regions() -> Self {
        Self {
            query: vec![ScbSelection {
                code: "Region".to_string(),
                selection: ScbFilter {
                    filter: "item".to_string(),
                    values: vec!["*".to_string()],
                },
            }],
            response: ScbFormat {
                format: "json".to_string(),
            },
        }
    }
}

/// "Västra Götaland" -> "västra_götaland"
fn region_id(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Admission data from UHR, region names from SCB.
pub struct LiveProvider {
    client: Client,
    uhr_endpoint: Url,
    scb_endpoint: Url,
}

impl LiveProvider {
    pub fn new(
        uhr_endpoint: &str,
        scb_endpoint: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e| {
                StatsError::InvalidConfigValueError {
                    field: "api_key".to_string(),
                    value: "<redacted>".to_string(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| StatsError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            uhr_endpoint: parse_endpoint("uhr_endpoint", uhr_endpoint)?,
            scb_endpoint: parse_endpoint("scb_endpoint", scb_endpoint)?,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(
            config.uhr_endpoint(),
            config.scb_endpoint(),
            config.api_key(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    fn uhr_url(&self, segments: &[&str]) -> Url {
        join_segments(&self.uhr_endpoint, segments)
    }

    async fn send<T: DeserializeOwned>(provider: &str, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| StatsError::provider_unavailable(provider, e.to_string()))?;

        let status = response.status();
        tracing::debug!("{} responded with {}", provider, status);
        if !status.is_success() {
            return Err(StatsError::provider_unavailable(
                provider,
                format!("{} returned {}", response.url(), status),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            StatsError::provider_unavailable(provider, format!("malformed response: {}", e))
        })
    }

    async fn get_uhr<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let envelope: Envelope<T> = Self::send(UHR, self.client.get(url)).await?;
        Ok(envelope.data)
    }
}

fn parse_endpoint(field: &str, endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| StatsError::InvalidConfigValueError {
        field: field.to_string(),
        value: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(StatsError::InvalidConfigValueError {
            field: field.to_string(),
            value: endpoint.to_string(),
            reason: "URL cannot carry a path".to_string(),
        });
    }
    Ok(url)
}

fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

#[async_trait]
impl DataProvider for LiveProvider {
    fn name(&self) -> &str {
        "live"
    }

    async fn fetch_universities(&self) -> Result<Vec<University>> {
        self.get_uhr(self.uhr_url(&["universities"])).await
    }

    async fn fetch_regions(&self) -> Result<Vec<Region>> {
        let url = join_segments(&self.scb_endpoint, &SCB_REGION_TABLE);
        tracing::debug!("POST {}", url);
        let response: ScbResponse =
            Self::send(SCB, self.client.post(url).json(&ScbQuery::all_regions())).await?;

        // The table has one row per (region, series); keep the first of each.
        let mut seen = HashSet::new();
        let regions = response
            .data
            .into_iter()
            .filter_map(|row| row.key.into_iter().next())
            .filter(|name| seen.insert(name.clone()))
            .map(|name| Region {
                id: region_id(&name),
                name,
            })
            .collect();
        Ok(regions)
    }

    async fn fetch_programs(&self, university_id: Option<&str>) -> Result<Vec<ProgramYearRecord>> {
        let university_ids = match university_id {
            Some(id) => vec![id.to_string()],
            None => self
                .fetch_universities()
                .await?
                .into_iter()
                .map(|u| u.id)
                .collect(),
        };

        let mut records = Vec::new();
        for id in &university_ids {
            let mut programs: Vec<ProgramYearRecord> = self
                .get_uhr(self.uhr_url(&["universities", id.as_str(), "programs"]))
                .await?;
            records.append(&mut programs);
        }
        tracing::debug!(
            "Fetched {} program records for {} universities",
            records.len(),
            university_ids.len()
        );
        Ok(records)
    }

    async fn fetch_region_shares(
        &self,
        university_id: &str,
        year: Option<i32>,
    ) -> Result<Vec<RegionObservation>> {
        let mut url = self.uhr_url(&["universities", university_id, "regions"]);
        if let Some(year) = year {
            url.query_pairs_mut().append_pair("year", &year.to_string());
        }
        self.get_uhr(url).await
    }

    async fn fetch_gender_raw(&self, university_id: &str) -> Result<Vec<RawGenderScope>> {
        self.get_uhr(self.uhr_url(&["universities", university_id, "gender"]))
            .await
    }
}
