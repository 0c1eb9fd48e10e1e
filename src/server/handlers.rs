use super::{error::ApiError, AppState};
use crate::domain::model::{
    GenderSplit, GeographicDistribution, ProgramYearRecord, Region, StatisticsFilter, University,
    UniversityYearAggregate,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

type ApiResult<T> = Result<Json<Vec<T>>, ApiError>;

/// Reads an optional query value, treating `?key=` like an absent key.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub university_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub from_year: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub to_year: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub program_id: Option<String>,
}

impl From<StatisticsQuery> for StatisticsFilter {
    fn from(query: StatisticsQuery) -> Self {
        StatisticsFilter {
            university_id: query.university_id,
            from_year: query.from_year,
            to_year: query.to_year,
            program_id: query.program_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct YearQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenderQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub program_id: Option<String>,
}

/// # GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// # GET /api/statistics
pub async fn list_statistics(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatisticsQuery>,
) -> ApiResult<ProgramYearRecord> {
    let filter = StatisticsFilter::from(query);
    let records = state
        .service
        .list_statistics(&filter)
        .await
        .map_err(|e| state.api_error(e))?;
    Ok(Json(records))
}

/// # GET /api/universities
pub async fn list_universities(State(state): State<Arc<AppState>>) -> ApiResult<University> {
    let universities = state
        .service
        .universities()
        .await
        .map_err(|e| state.api_error(e))?;
    Ok(Json(universities))
}

/// # GET /api/regions
pub async fn list_regions(State(state): State<Arc<AppState>>) -> ApiResult<Region> {
    let regions = state
        .service
        .regions()
        .await
        .map_err(|e| state.api_error(e))?;
    Ok(Json(regions))
}

/// # GET /api/universities/:university_id/statistics
pub async fn university_statistics(
    Path(university_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<UniversityYearAggregate> {
    let aggregates = state
        .service
        .university_statistics(&university_id)
        .await
        .map_err(|e| state.api_error(e))?;
    Ok(Json(aggregates))
}

/// # GET /api/universities/:university_id/geographic-distribution
/// Years whose shares cannot be normalized are left out; the request fails only when all do.
pub async fn geographic_distribution(
    Path(university_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<YearQuery>,
) -> ApiResult<GeographicDistribution> {
    let distributions = state
        .service
        .geographic_distribution(&university_id, query.year)
        .await
        .and_then(|normalized| normalized.into_result())
        .map_err(|e| state.api_error(e))?;
    Ok(Json(distributions))
}

/// # GET /api/universities/:university_id/gender-distribution
pub async fn gender_distribution(
    Path(university_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<GenderQuery>,
) -> ApiResult<GenderSplit> {
    let splits = state
        .service
        .gender_distribution(&university_id, query.year, query.program_id.as_deref())
        .await
        .and_then(|normalized| normalized.into_result())
        .map_err(|e| state.api_error(e))?;
    Ok(Json(splits))
}
