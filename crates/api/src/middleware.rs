//! API middleware.

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use murmur_core::Processor;
use murmur_db::DynStore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::auth::Authenticator;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub processor: Processor,
    pub store: DynStore,
    pub authenticator: Arc<dyn Authenticator>,
    /// Cancelled when the server begins shutting down; bounds how long a
    /// handler may wait on a full queue.
    pub shutdown: CancellationToken,
    /// Retention used when a media cleanup request does not name one.
    pub media_remote_cache_days: u32,
}

/// Authentication middleware.
///
/// Puts the authenticated account into the request extensions. Requests
/// without a valid token pass through unauthenticated.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.authenticator.authenticate(token).await {
            Ok(account) => {
                req.extensions_mut().insert(account);
            }
            Err(e) => debug!(error = %e, "Bearer token rejected"),
        }
    }

    next.run(req).await
}
