use crate::utils::error::StatsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

const GENERIC_MESSAGE: &str = "An unexpected error occurred";

/// A failed query, rendered as a 500 with a JSON body.
///
/// Outside development the body carries a generic message instead of the error text.
#[derive(Debug)]
pub struct ApiError {
    error: StatsError,
    expose_details: bool,
}

impl ApiError {
    pub fn new(error: StatsError, expose_details: bool) -> Self {
        Self {
            error,
            expose_details,
        }
    }

    pub fn error(&self) -> &StatsError {
        &self.error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(
            error = %self.error,
            category = ?self.error.category(),
            "Request failed"
        );

        let message = if self.expose_details {
            self.error.to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        };

        let body = Json(json!({
            "error": "Internal server error",
            "message": message,
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
