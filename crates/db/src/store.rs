//! Storage interface consumed by the processor and the media manager.
//!
//! Implementations must serialize conflicting writes to the same entity:
//! concurrent workers may record faves or follows for the same status or
//! account at the same time, and none of those writes may be lost.

#![allow(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use murmur_common::{AppError, AppResult};
use url::Url;

use crate::entities::{Account, Follow, MediaAttachment, Notification, Status, StatusFave};

/// Shared handle to a store implementation.
pub type DynStore = Arc<dyn Store>;

/// CRUD and existence checks keyed by domain IDs.
#[async_trait]
pub trait Store: Send + Sync {
    // === Accounts ===

    async fn find_account(&self, id: &str) -> AppResult<Option<Account>>;

    async fn find_account_by_uri(&self, uri: &Url) -> AppResult<Option<Account>>;

    async fn find_local_account_by_username(&self, username: &str)
    -> AppResult<Option<Account>>;

    async fn put_account(&self, account: Account) -> AppResult<()>;

    /// Get an account, failing with `AccountNotFound` if it does not exist.
    async fn get_account(&self, id: &str) -> AppResult<Account> {
        self.find_account(id)
            .await?
            .ok_or_else(|| AppError::AccountNotFound(id.to_string()))
    }

    // === Statuses ===

    async fn find_status(&self, id: &str) -> AppResult<Option<Status>>;

    async fn find_status_by_uri(&self, uri: &Url) -> AppResult<Option<Status>>;

    async fn put_status(&self, status: Status) -> AppResult<()>;

    /// Delete a status together with its faves. Returns whether it existed.
    async fn delete_status(&self, id: &str) -> AppResult<bool>;

    async fn statuses_by_account(&self, account_id: &str) -> AppResult<Vec<Status>>;

    /// Get a status, failing with `StatusNotFound` if it does not exist.
    async fn get_status(&self, id: &str) -> AppResult<Status> {
        self.find_status(id)
            .await?
            .ok_or_else(|| AppError::StatusNotFound(id.to_string()))
    }

    // === Faves ===

    async fn find_fave(&self, account_id: &str, status_id: &str) -> AppResult<Option<StatusFave>>;

    async fn find_fave_by_uri(&self, uri: &Url) -> AppResult<Option<StatusFave>>;

    /// Insert a fave unless the account already faved the status.
    ///
    /// Returns `false` when an existing fave made this a no-op.
    async fn put_fave(&self, fave: StatusFave) -> AppResult<bool>;

    async fn delete_fave(&self, id: &str) -> AppResult<bool>;

    async fn count_faves(&self, status_id: &str) -> AppResult<u64>;

    // === Follows ===

    async fn find_follow(
        &self,
        account_id: &str,
        target_account_id: &str,
    ) -> AppResult<Option<Follow>>;

    async fn find_follow_by_uri(&self, uri: &Url) -> AppResult<Option<Follow>>;

    /// Insert a follow unless one already exists for the same pair.
    ///
    /// Returns `false` when an existing follow made this a no-op.
    async fn put_follow(&self, follow: Follow) -> AppResult<bool>;

    /// Replace an existing follow, failing with `NotFound` if it is gone.
    async fn update_follow(&self, follow: Follow) -> AppResult<()>;

    async fn delete_follow(&self, id: &str) -> AppResult<bool>;

    /// Accounts with an accepted follow of the given account.
    async fn followers(&self, account_id: &str) -> AppResult<Vec<Account>>;

    /// Whether `account_id` has an accepted follow of `target_account_id`.
    async fn is_following(&self, account_id: &str, target_account_id: &str) -> AppResult<bool> {
        Ok(self
            .find_follow(account_id, target_account_id)
            .await?
            .is_some_and(|follow| !follow.pending))
    }

    // === Notifications ===

    async fn put_notification(&self, notification: Notification) -> AppResult<()>;

    async fn notifications_for(&self, account_id: &str) -> AppResult<Vec<Notification>>;

    // === Media ===

    async fn find_attachment(&self, id: &str) -> AppResult<Option<MediaAttachment>>;

    async fn put_attachment(&self, attachment: MediaAttachment) -> AppResult<()>;

    async fn delete_attachment(&self, id: &str) -> AppResult<bool>;

    /// Remote attachments whose files are still cached and that were created
    /// before `cutoff`.
    async fn remote_cached_attachments_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<MediaAttachment>>;

    /// Local status media never attached to a status, created before `cutoff`.
    async fn unattached_local_attachments_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<MediaAttachment>>;

    /// Remote avatars and headers.
    async fn remote_meta_attachments(&self) -> AppResult<Vec<MediaAttachment>>;
}
