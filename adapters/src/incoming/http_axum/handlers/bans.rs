use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use tracing::instrument;

use crate::incoming::http_axum::{
    dto::requests::BanEditForm,
    error_mapper::HttpError,
    templates::{BanEditTemplate, BanNotFoundTemplate, BansListTemplate, render},
};
use crate::shared::app_state::AppState;
use chanban_application::{
    ban::view::{BanEditView, BanListView},
    error::{AppError, AppResult},
};
use domain::ban::EditCapability;

type PageResult = Result<Html<String>, HttpError>;

fn list_page(view: BanListView) -> PageResult {
    Ok(render(&BansListTemplate { view })?)
}

/// Unknown or mismatched edit links get an in-page notice instead of an error status.
fn edit_page(outcome: AppResult<BanEditView>) -> PageResult {
    match outcome {
        Ok(view) => Ok(render(&BanEditTemplate { view })?),
        Err(AppError::BanAccess(_)) => Ok(render(&BanNotFoundTemplate)?),
        Err(e) => Err(HttpError(e)),
    }
}

#[allow(clippy::unused_async)]
pub async fn index() -> Redirect {
    Redirect::to("/bans")
}

#[instrument(skip(state))]
pub async fn list_active(State(state): State<AppState>) -> PageResult {
    let view = state.ban_listing_use_case.list_active().await?;
    list_page(view)
}

#[instrument(skip(state))]
pub async fn list_recently_expired(State(state): State<AppState>) -> PageResult {
    let view = state.ban_listing_use_case.list_recently_expired().await?;
    list_page(view)
}

#[instrument(skip(state))]
pub async fn list_all(State(state): State<AppState>) -> PageResult {
    let view = state.ban_listing_use_case.list_all().await?;
    list_page(view)
}

#[instrument(skip(state, token))]
pub async fn view_ban_edit(
    State(state): State<AppState>,
    Path((row_id, token)): Path<(String, String)>,
) -> PageResult {
    let capability = EditCapability::new(row_id, token);
    edit_page(state.ban_edit_use_case.view_ban(&capability).await)
}

#[instrument(skip(state, token, form))]
pub async fn submit_ban_edit(
    State(state): State<AppState>,
    Path((row_id, token)): Path<(String, String)>,
    Form(form): Form<BanEditForm>,
) -> PageResult {
    let capability = EditCapability::new(row_id, token);
    edit_page(
        state
            .ban_edit_use_case
            .submit_ban_edit(&capability, form.into())
            .await,
    )
}
