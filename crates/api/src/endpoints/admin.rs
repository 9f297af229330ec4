//! Admin endpoints.

use axum::{Json, Router, extract::State, routing::post};
use murmur_common::{AppError, AppResult};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{extractors::AuthAccount, middleware::AppState};

#[derive(Debug, Deserialize)]
pub struct MediaCleanupRequest {
    /// Days remote media stays cached; the configured value if omitted.
    pub remote_cache_days: Option<i64>,
}

/// Start a media prune. Returns as soon as the jobs are started.
async fn media_cleanup(
    AuthAccount(account): AuthAccount,
    State(state): State<AppState>,
    Json(req): Json<MediaCleanupRequest>,
) -> AppResult<Json<Value>> {
    if !account.admin {
        return Err(AppError::Forbidden("admin only".to_string()));
    }

    let days = req
        .remote_cache_days
        .unwrap_or_else(|| i64::from(state.media_remote_cache_days));
    state.processor.media_prune(&state.shutdown, days)?;

    Ok(Json(json!({})))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/media_cleanup", post(media_cleanup))
}
