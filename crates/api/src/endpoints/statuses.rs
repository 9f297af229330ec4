//! Status fave endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use chrono::{DateTime, Utc};
use murmur_common::AppResult;
use murmur_db::entities::{Status, Visibility};
use serde::Serialize;

use crate::{extractors::AuthAccount, middleware::AppState};

/// Status as returned to the client.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub id: String,
    pub uri: String,
    pub account_id: String,
    pub content: String,
    pub visibility: Visibility,
    pub favourited: bool,
    pub favourites_count: u64,
    pub created_at: DateTime<Utc>,
}

async fn render(state: &AppState, viewer_id: &str, status: Status) -> AppResult<StatusResponse> {
    let favourites_count = state.store.count_faves(&status.id).await?;
    let favourited = state.store.find_fave(viewer_id, &status.id).await?.is_some();
    Ok(StatusResponse {
        id: status.id,
        uri: status.uri.to_string(),
        account_id: status.account_id,
        content: status.content,
        visibility: status.visibility,
        favourited,
        favourites_count,
        created_at: status.created_at,
    })
}

/// Fave a status.
async fn favourite(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let status = state
        .processor
        .status_fave(&state.shutdown, &account, &id)
        .await?;
    Ok(Json(render(&state, &account.id, status).await?))
}

/// Remove a fave.
async fn unfavourite(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let status = state
        .processor
        .status_unfave(&state.shutdown, &account, &id)
        .await?;
    Ok(Json(render(&state, &account.id, status).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/favourite", post(favourite))
        .route("/{id}/unfavourite", post(unfavourite))
}
