use axum::{Router, http::Uri, routing::get};

use crate::incoming::http_axum::{
    error_mapper::HttpError,
    handlers::{
        bans::{
            index, list_active, list_all, list_recently_expired, submit_ban_edit, view_ban_edit,
        },
        health::health_check,
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;
use chanban_application::error::AppError;

pub fn build_application_router() -> Router<AppState> {
    build_ban_routes()
        .route("/health", get(health_check))
        .fallback(not_found)
        .with_request_id()
}

fn build_ban_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/bans", get(list_active))
        .route("/bans/expired", get(list_recently_expired))
        .route("/bans/all", get(list_all))
        .route(
            "/bans/edit/{row_id}/{token}",
            get(view_ban_edit).post(submit_ban_edit),
        )
}

#[allow(clippy::unused_async)]
async fn not_found(uri: Uri) -> HttpError {
    HttpError(AppError::NotFound {
        message: format!("No page at {}", uri.path()),
    })
}
