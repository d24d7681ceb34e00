use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::bootstrap::state::AppState;
use chanban_adapters::incoming::http_axum::routes::build_application_router;

pub fn create_router(state: &AppState) -> Router {
    build_application_router()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state.to_adapters_state())
}
