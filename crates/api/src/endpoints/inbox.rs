//! `ActivityPub` inbox.
//!
//! Received activities are queued for the federator pool and acknowledged
//! with 202 before they are processed.

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use murmur_common::{AppError, AppResult};
use murmur_federation::Activity;
use murmur_queue::{FromFederator, InboundActivity};
use serde_json::Value;
use tracing::{debug, info};

use crate::middleware::AppState;

/// Accept an activity addressed to a local account.
async fn user_inbox(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Bytes,
) -> AppResult<StatusCode> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("invalid activity JSON: {e}")))?;

    let receiving_account = state
        .store
        .find_local_account_by_username(&username)
        .await?
        .ok_or_else(|| AppError::AccountNotFound(username.clone()))?;

    let activity: Activity = match serde_json::from_value(value) {
        Ok(activity) => activity,
        Err(e) => {
            // Activity types we do not handle are acknowledged and dropped.
            debug!(error = %e, inbox = %username, "Ignoring unsupported activity");
            return Ok(StatusCode::ACCEPTED);
        }
    };

    let requesting_account = state
        .store
        .find_account_by_uri(activity.actor())
        .await?
        .ok_or(AppError::Unauthorized)?;

    info!(
        activity_type = activity.kind(),
        actor = %requesting_account.uri,
        inbox = %username,
        "Received activity"
    );

    state
        .processor
        .workers()
        .enqueue_federator(
            &state.shutdown,
            FromFederator::Inbound(InboundActivity {
                activity,
                requesting_account,
                receiving_account,
            }),
        )
        .await?;

    Ok(StatusCode::ACCEPTED)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/users/{username}/inbox", post(user_inbox))
}
