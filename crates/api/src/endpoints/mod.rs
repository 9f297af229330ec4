//! API endpoints.

mod admin;
mod inbox;
mod statuses;

use axum::Router;

use crate::middleware::AppState;

pub use statuses::StatusResponse;

/// Create the router for the client API and the inbox.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1/statuses", statuses::router())
        .nest("/api/v1/admin", admin::router())
        .merge(inbox::router())
}
