use axum::{Json, extract::State};

use crate::incoming::http_axum::dto::responses::{ApiResponse, HealthResponse};
use crate::shared::app_state::AppState;

#[allow(clippy::unused_async)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success_with_data(Some(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.env.clone(),
    })))
}
