//! Media cache maintenance.
//!
//! Each prune is a complete traversal with no state carried between runs:
//! whatever was pruned before no longer matches the selection, so running a
//! prune twice does nothing the second time.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use murmur_common::{AppResult, StorageBackend};
use murmur_db::DynStore;
use murmur_db::entities::MediaAttachment;
use tracing::debug;

/// Media maintenance operations, each returning the number of attachments
/// affected.
#[async_trait]
pub trait MediaManager: Send + Sync {
    /// Uncache remote attachments created more than `older_than_days` ago.
    async fn prune_all_remote(&self, older_than_days: u32) -> AppResult<usize>;

    /// Remove local uploads that were never attached to a status.
    async fn prune_unused_local_attachments(&self) -> AppResult<usize>;

    /// Remove remote avatars and headers their account no longer uses.
    async fn prune_all_meta(&self) -> AppResult<usize>;
}

/// [`MediaManager`] over a [`Store`](murmur_db::Store) and a storage backend.
pub struct StoreMediaManager {
    store: DynStore,
    storage: Arc<dyn StorageBackend>,
    unused_local_attachment_days: u32,
}

impl StoreMediaManager {
    #[must_use]
    pub fn new(
        store: DynStore,
        storage: Arc<dyn StorageBackend>,
        unused_local_attachment_days: u32,
    ) -> Self {
        Self {
            store,
            storage,
            unused_local_attachment_days,
        }
    }

    async fn delete_files(&self, attachment: &MediaAttachment) -> AppResult<()> {
        self.storage.delete(&attachment.file_key).await?;
        self.storage.delete(&attachment.thumbnail_key).await
    }
}

#[async_trait]
impl MediaManager for StoreMediaManager {
    async fn prune_all_remote(&self, older_than_days: u32) -> AppResult<usize> {
        let cutoff = Utc::now() - Duration::days(i64::from(older_than_days));
        let mut pruned = 0;

        for mut attachment in self.store.remote_cached_attachments_before(cutoff).await? {
            self.delete_files(&attachment).await?;
            attachment.cached = false;
            debug!(attachment_id = %attachment.id, "Uncached remote attachment");
            self.store.put_attachment(attachment).await?;
            pruned += 1;
        }

        Ok(pruned)
    }

    async fn prune_unused_local_attachments(&self) -> AppResult<usize> {
        let cutoff = Utc::now() - Duration::days(i64::from(self.unused_local_attachment_days));
        let mut pruned = 0;

        for attachment in self
            .store
            .unattached_local_attachments_before(cutoff)
            .await?
        {
            self.delete_files(&attachment).await?;
            if self.store.delete_attachment(&attachment.id).await? {
                debug!(attachment_id = %attachment.id, "Removed unused local attachment");
                pruned += 1;
            }
        }

        Ok(pruned)
    }

    async fn prune_all_meta(&self) -> AppResult<usize> {
        let mut pruned = 0;

        for attachment in self.store.remote_meta_attachments().await? {
            let in_use = self
                .store
                .find_account(&attachment.account_id)
                .await?
                .is_some_and(|account| account.uses_attachment(&attachment.id));
            if in_use {
                continue;
            }

            self.delete_files(&attachment).await?;
            if self.store.delete_attachment(&attachment.id).await? {
                debug!(attachment_id = %attachment.id, "Removed orphaned avatar/header");
                pruned += 1;
            }
        }

        Ok(pruned)
    }
}
