use admission_stats::adapters::{Dataset, FallbackProvider};
use admission_stats::domain::model::RegionObservation;
use admission_stats::domain::ports::DataProvider;
use admission_stats::server::{self, AppState};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn_api(provider: Arc<dyn DataProvider>, development: bool) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base = format!("http://{}", listener.local_addr()?);
    let app = server::router(Arc::new(AppState::new(provider, development)));
    tokio::spawn(server::serve(listener, app));
    Ok(base)
}

fn zero_share_dataset() -> Dataset {
    let observation = |region: &str| RegionObservation {
        university_id: "kth".to_string(),
        year: 2020,
        region_id: region.to_string(),
        region_name: region.to_string(),
        applicant_count: 0,
        raw_share: 0.0,
    };

    Dataset {
        region_observations: vec![observation("stockholm"), observation("uppsala")],
        ..Dataset::default()
    }
}

#[tokio::test]
async fn test_health_probe() -> anyhow::Result<()> {
    let base = spawn_api(Arc::new(FallbackProvider::seeded(2024)), false).await?;

    let body: Value = reqwest::get(format!("{}/health", base)).await?.json().await?;
    assert_eq!(body["status"], "UP");
    assert!(body["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_statistics_routes_use_camel_case() -> anyhow::Result<()> {
    let base = spawn_api(Arc::new(FallbackProvider::seeded(2024)), false).await?;
    let client = reqwest::Client::new();

    let records: Value = client
        .get(format!("{}/api/statistics", base))
        .query(&[("universityId", "kth"), ("fromYear", "2015"), ("toYear", "2016"), ("programId", "kth-cs")])
        .send()
        .await?
        .json()
        .await?;
    let records = records.as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 2);
    assert!(records[0]["acceptedStudents"].is_u64());
    assert!(records[0]["firstHandApplicants"].is_u64());

    let aggregates: Value = client
        .get(format!("{}/api/universities/su/statistics", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(aggregates.as_array().map(Vec::len), Some(14));
    assert!(aggregates[0]["totalApplicants"].is_u64());
    assert_eq!(aggregates[0]["year"], 2010);

    let universities: Value = client
        .get(format!("{}/api/universities", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(universities.as_array().map(Vec::len), Some(5));

    let regions: Value = client
        .get(format!("{}/api/regions", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(regions.as_array().map(Vec::len), Some(21));
    Ok(())
}

#[tokio::test]
async fn test_distribution_routes() -> anyhow::Result<()> {
    let base = spawn_api(Arc::new(FallbackProvider::seeded(2024)), false).await?;
    let client = reqwest::Client::new();

    let geographic: Value = client
        .get(format!("{}/api/universities/lu/geographic-distribution", base))
        .query(&[("year", "2018")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(geographic.as_array().map(Vec::len), Some(1));
    let total: f64 = geographic[0]["regionData"]
        .as_array()
        .map(|regions| regions.iter().filter_map(|r| r["percentage"].as_f64()).sum())
        .unwrap_or_default();
    assert!((total - 100.0).abs() < 1e-6);

    let gender: Value = client
        .get(format!("{}/api/universities/kth/gender-distribution", base))
        .query(&[("year", "2020"), ("programId", "kth-med")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(gender.as_array().map(Vec::len), Some(1));
    assert_eq!(gender[0]["programId"], "kth-med");
    assert!(gender[0]["femaleApplicants"].as_u64() > gender[0]["maleApplicants"].as_u64());
    Ok(())
}

#[tokio::test]
async fn test_non_numeric_year_is_rejected() -> anyhow::Result<()> {
    let base = spawn_api(Arc::new(FallbackProvider::seeded(2024)), false).await?;

    let response = reqwest::get(format!(
        "{}/api/universities/kth/geographic-distribution?year=latest",
        base
    ))
    .await?;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_empty_query_values_are_ignored() -> anyhow::Result<()> {
    let base = spawn_api(Arc::new(FallbackProvider::seeded(2024)), false).await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/statistics", base))
        .query(&[("universityId", ""), ("fromYear", ""), ("toYear", ""), ("programId", "")])
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let records: Value = response.json().await?;
    assert_eq!(records.as_array().map(Vec::len), Some(5 * 3 * 14));

    let response = client
        .get(format!("{}/api/universities/kth/geographic-distribution", base))
        .query(&[("year", "")])
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let geographic: Value = response.json().await?;
    assert_eq!(geographic.as_array().map(Vec::len), Some(14));

    let response = client
        .get(format!("{}/api/universities/kth/gender-distribution", base))
        .query(&[("year", ""), ("programId", "")])
        .send()
        .await?;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let gender: Value = response.json().await?;
    assert_eq!(gender.as_array().map(Vec::len), Some(14 * 4));
    Ok(())
}

#[tokio::test]
async fn test_failures_hide_details_outside_development() -> anyhow::Result<()> {
    let url = "/api/universities/kth/geographic-distribution";

    let base = spawn_api(Arc::new(FallbackProvider::new(zero_share_dataset())), false).await?;
    let response = reqwest::get(format!("{}{}", base, url)).await?;
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(body["message"], "An unexpected error occurred");

    let base = spawn_api(Arc::new(FallbackProvider::new(zero_share_dataset())), true).await?;
    let body: Value = reqwest::get(format!("{}{}", base, url)).await?.json().await?;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["message"]
        .as_str()
        .is_some_and(|m| m.contains("kth/2020")));
    Ok(())
}
