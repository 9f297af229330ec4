//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use murmur_common::AppError;
use murmur_db::entities::Account;

/// Authenticated account extractor.
#[derive(Debug, Clone)]
pub struct AuthAccount(pub Account);

impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<Account>()
            .cloned()
            .map(AuthAccount)
            .ok_or(AppError::Unauthorized)
    }
}
