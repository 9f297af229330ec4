//! In-memory store.
//!
//! All tables sit behind one lock, so every write is serialized against every
//! other write and check-then-insert sequences (fave or follow uniqueness)
//! are atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use murmur_common::{AppError, AppResult};
use tokio::sync::RwLock;
use url::Url;

use crate::entities::{Account, Follow, MediaAttachment, Notification, Status, StatusFave};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    statuses: HashMap<String, Status>,
    faves: HashMap<String, StatusFave>,
    follows: HashMap<String, Follow>,
    notifications: Vec<Notification>,
    attachments: HashMap<String, MediaAttachment>,
}

/// Store keeping every table in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_account(&self, id: &str) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(id).cloned())
    }

    async fn find_account_by_uri(&self, uri: &Url) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| &a.uri == uri).cloned())
    }

    async fn find_local_account_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.is_local() && a.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn put_account(&self, account: Account) -> AppResult<()> {
        self.tables
            .write()
            .await
            .accounts
            .insert(account.id.clone(), account);
        Ok(())
    }

    async fn find_status(&self, id: &str) -> AppResult<Option<Status>> {
        Ok(self.tables.read().await.statuses.get(id).cloned())
    }

    async fn find_status_by_uri(&self, uri: &Url) -> AppResult<Option<Status>> {
        let tables = self.tables.read().await;
        Ok(tables.statuses.values().find(|s| &s.uri == uri).cloned())
    }

    async fn put_status(&self, status: Status) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .statuses
            .values()
            .any(|s| s.uri == status.uri && s.id != status.id)
        {
            return Err(AppError::Conflict(format!(
                "status with uri {} already exists",
                status.uri
            )));
        }
        tables.statuses.insert(status.id.clone(), status);
        Ok(())
    }

    async fn delete_status(&self, id: &str) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let existed = tables.statuses.remove(id).is_some();
        if existed {
            tables.faves.retain(|_, fave| fave.status_id != id);
        }
        Ok(existed)
    }

    async fn statuses_by_account(&self, account_id: &str) -> AppResult<Vec<Status>> {
        let tables = self.tables.read().await;
        let mut statuses: Vec<Status> = tables
            .statuses
            .values()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect();
        statuses.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(statuses)
    }

    async fn find_fave(&self, account_id: &str, status_id: &str) -> AppResult<Option<StatusFave>> {
        let tables = self.tables.read().await;
        Ok(tables
            .faves
            .values()
            .find(|f| f.account_id == account_id && f.status_id == status_id)
            .cloned())
    }

    async fn find_fave_by_uri(&self, uri: &Url) -> AppResult<Option<StatusFave>> {
        let tables = self.tables.read().await;
        Ok(tables.faves.values().find(|f| &f.uri == uri).cloned())
    }

    async fn put_fave(&self, fave: StatusFave) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .faves
            .values()
            .any(|f| f.account_id == fave.account_id && f.status_id == fave.status_id)
        {
            return Ok(false);
        }
        tables.faves.insert(fave.id.clone(), fave);
        Ok(true)
    }

    async fn delete_fave(&self, id: &str) -> AppResult<bool> {
        Ok(self.tables.write().await.faves.remove(id).is_some())
    }

    async fn count_faves(&self, status_id: &str) -> AppResult<u64> {
        let tables = self.tables.read().await;
        Ok(tables
            .faves
            .values()
            .filter(|f| f.status_id == status_id)
            .count() as u64)
    }

    async fn find_follow(
        &self,
        account_id: &str,
        target_account_id: &str,
    ) -> AppResult<Option<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .values()
            .find(|f| f.account_id == account_id && f.target_account_id == target_account_id)
            .cloned())
    }

    async fn find_follow_by_uri(&self, uri: &Url) -> AppResult<Option<Follow>> {
        let tables = self.tables.read().await;
        Ok(tables.follows.values().find(|f| &f.uri == uri).cloned())
    }

    async fn put_follow(&self, follow: Follow) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.follows.values().any(|f| {
            f.account_id == follow.account_id && f.target_account_id == follow.target_account_id
        }) {
            return Ok(false);
        }
        tables.follows.insert(follow.id.clone(), follow);
        Ok(true)
    }

    async fn update_follow(&self, follow: Follow) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        match tables.follows.get_mut(&follow.id) {
            Some(existing) => {
                *existing = follow;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("follow {}", follow.id))),
        }
    }

    async fn delete_follow(&self, id: &str) -> AppResult<bool> {
        Ok(self.tables.write().await.follows.remove(id).is_some())
    }

    async fn followers(&self, account_id: &str) -> AppResult<Vec<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .values()
            .filter(|f| f.target_account_id == account_id && !f.pending)
            .filter_map(|f| tables.accounts.get(&f.account_id).cloned())
            .collect())
    }

    async fn put_notification(&self, notification: Notification) -> AppResult<()> {
        self.tables.write().await.notifications.push(notification);
        Ok(())
    }

    async fn notifications_for(&self, account_id: &str) -> AppResult<Vec<Notification>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notifications
            .iter()
            .filter(|n| n.target_account_id == account_id)
            .cloned()
            .collect())
    }

    async fn find_attachment(&self, id: &str) -> AppResult<Option<MediaAttachment>> {
        Ok(self.tables.read().await.attachments.get(id).cloned())
    }

    async fn put_attachment(&self, attachment: MediaAttachment) -> AppResult<()> {
        self.tables
            .write()
            .await
            .attachments
            .insert(attachment.id.clone(), attachment);
        Ok(())
    }

    async fn delete_attachment(&self, id: &str) -> AppResult<bool> {
        Ok(self.tables.write().await.attachments.remove(id).is_some())
    }

    async fn remote_cached_attachments_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<MediaAttachment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attachments
            .values()
            .filter(|a| a.is_remote() && a.cached && a.created_at < cutoff)
            .cloned()
            .collect())
    }

    async fn unattached_local_attachments_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> AppResult<Vec<MediaAttachment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attachments
            .values()
            .filter(|a| {
                !a.is_remote() && !a.is_meta() && a.status_id.is_none() && a.created_at < cutoff
            })
            .cloned()
            .collect())
    }

    async fn remote_meta_attachments(&self) -> AppResult<Vec<MediaAttachment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attachments
            .values()
            .filter(|a| a.is_remote() && a.is_meta())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_utils::{fave, local_account, public_status, remote_account};

    #[tokio::test]
    async fn test_put_fave_is_unique_per_account_and_status() {
        let store = MemoryStore::new();
        let author = local_account("01author", "author");
        let faver = remote_account("01faver", "faver", "remote.example");
        let status = public_status("01status", &author);

        let first = fave("01fave1", &faver, &status);
        let second = fave("01fave2", &faver, &status);

        assert!(store.put_fave(first).await.unwrap());
        assert!(!store.put_fave(second).await.unwrap());
        assert_eq!(store.count_faves("01status").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_faves_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let author = local_account("01author", "author");
        let status = public_status("01status", &author);
        store.put_status(status.clone()).await.unwrap();

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = store.clone();
                let faver = remote_account(&format!("01faver{i}"), "faver", "remote.example");
                let fave = fave(&format!("01fave{i}"), &faver, &status);
                tokio::spawn(async move { store.put_fave(fave).await.unwrap() })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert_eq!(store.count_faves("01status").await.unwrap(), 32);
    }

    #[tokio::test]
    async fn test_delete_status_removes_its_faves() {
        let store = MemoryStore::new();
        let author = local_account("01author", "author");
        let faver = remote_account("01faver", "faver", "remote.example");
        let status = public_status("01status", &author);
        store.put_status(status.clone()).await.unwrap();
        store.put_fave(fave("01fave", &faver, &status)).await.unwrap();

        assert!(store.delete_status("01status").await.unwrap());
        assert!(!store.delete_status("01status").await.unwrap());
        assert_eq!(store.count_faves("01status").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_followers_only_include_accepted_follows() {
        let store = MemoryStore::new();
        let author = local_account("01author", "author");
        let accepted = remote_account("01accepted", "a", "one.example");
        let pending = remote_account("01pending", "p", "two.example");
        for account in [&author, &accepted, &pending] {
            store.put_account(account.clone()).await.unwrap();
        }

        let mut follow = crate::test_utils::follow("01f1", &accepted, &author);
        store.put_follow(follow.clone()).await.unwrap();
        follow = crate::test_utils::follow("01f2", &pending, &author);
        follow.pending = true;
        store.put_follow(follow).await.unwrap();

        let followers = store.followers("01author").await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, "01accepted");
        assert!(store.is_following("01accepted", "01author").await.unwrap());
        assert!(!store.is_following("01pending", "01author").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_status_uri_conflicts() {
        let store = MemoryStore::new();
        let author = local_account("01author", "author");
        let status = public_status("01status", &author);
        let mut copy = status.clone();
        copy.id = "01other".to_string();

        store.put_status(status).await.unwrap();
        let err = store.put_status(copy).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
