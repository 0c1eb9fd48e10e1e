// HTTP transport: JSON routes over the statistics service.

pub mod error;
pub mod handlers;

use crate::core::query::StatisticsService;
use crate::domain::ports::DataProvider;
use crate::utils::error::StatsError;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::ApiError;

/// The shared state every handler can access.
pub struct AppState {
    pub service: StatisticsService<Arc<dyn DataProvider>>,
    pub development: bool,
}

impl AppState {
    pub fn new(provider: Arc<dyn DataProvider>, development: bool) -> Self {
        Self {
            service: StatisticsService::new(provider),
            development,
        }
    }

    pub fn api_error(&self, error: StatsError) -> ApiError {
        ApiError::new(error, self.development)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/statistics", get(handlers::list_statistics))
        .route("/api/universities", get(handlers::list_universities))
        .route(
            "/api/universities/:university_id/statistics",
            get(handlers::university_statistics),
        )
        .route(
            "/api/universities/:university_id/geographic-distribution",
            get(handlers::geographic_distribution),
        )
        .route(
            "/api/universities/:university_id/gender-distribution",
            get(handlers::gender_distribution),
        )
        .route("/api/regions", get(handlers::list_regions))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serves `app` on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    tracing::info!("Admission statistics API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, router(Arc::new(state))).await
}
