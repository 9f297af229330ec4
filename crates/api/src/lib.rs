//! HTTP surface for murmur.
//!
//! Handlers authenticate the request, turn it into a processor call or a
//! queued message, and answer without waiting for side effects:
//!
//! - `POST /api/v1/statuses/{id}/favourite` and `/unfavourite`
//! - `POST /api/v1/admin/media_cleanup`
//! - `POST /users/{username}/inbox`
//!
//! Built on Axum 0.8.

pub mod auth;
pub mod endpoints;
pub mod extractors;
pub mod middleware;

use axum::{Router, middleware::from_fn_with_state};

pub use auth::{Authenticator, StaticTokenAuthenticator};
pub use endpoints::StatusResponse;
pub use middleware::AppState;

/// Build the application router with authentication applied.
pub fn router(state: AppState) -> Router {
    endpoints::router()
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .with_state(state)
}
