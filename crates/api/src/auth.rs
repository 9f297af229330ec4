//! Bearer token authentication.
//!
//! Accounts are resolved from tokens by an [`Authenticator`]; handlers only
//! ever see the resolved account.

use std::collections::HashMap;

use async_trait::async_trait;
use murmur_common::{AppError, AppResult};
use murmur_db::DynStore;
use murmur_db::entities::Account;

/// Resolves a bearer token to an account.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Fails with [`AppError::Unauthorized`] for unknown tokens.
    async fn authenticate(&self, token: &str) -> AppResult<Account>;
}

/// Authenticator over a fixed token to account ID map.
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, String>,
    store: DynStore,
}

impl StaticTokenAuthenticator {
    #[must_use]
    pub const fn new(tokens: HashMap<String, String>, store: DynStore) -> Self {
        Self { tokens, store }
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self, token: &str) -> AppResult<Account> {
        let account_id = self.tokens.get(token).ok_or(AppError::Unauthorized)?;
        self.store
            .find_account(account_id)
            .await?
            .filter(Account::is_local)
            .ok_or(AppError::Unauthorized)
    }
}
