//! Status actions called from API handlers.

use chrono::Utc;
use murmur_common::{AppError, AppResult};
use murmur_db::entities::{Account, Status, StatusFave, Visibility};
use murmur_queue::{ClientAction, FromClientApi};
use tokio_util::sync::CancellationToken;

use super::Processor;

impl Processor {
    /// Fave a status on behalf of `account`.
    ///
    /// Faving an already faved status succeeds without side effects. The
    /// fave is stored before this returns; notification and federation
    /// happen later on the client API pool.
    pub async fn status_fave(
        &self,
        ctx: &CancellationToken,
        account: &Account,
        status_id: &str,
    ) -> AppResult<Status> {
        let status = self.store.get_status(status_id).await?;
        self.ensure_visible(account, &status).await?;
        if status.is_boost() {
            return Err(AppError::BadRequest(
                "boosts cannot be faved; fave the original status".to_string(),
            ));
        }

        if self.store.find_fave(&account.id, &status.id).await?.is_some() {
            return Ok(status);
        }

        let target_account = self.store.get_account(&status.account_id).await?;
        let id = self.id_gen.generate();
        let fave = StatusFave {
            uri: self.uris.fave_uri(&account.username, &id)?,
            id,
            account_id: account.id.clone(),
            target_account_id: target_account.id.clone(),
            status_id: status.id.clone(),
            created_at: Utc::now(),
        };

        // Lost a race with a concurrent fave by the same account.
        if !self.store.put_fave(fave.clone()).await? {
            return Ok(status);
        }

        let msg = FromClientApi::new(
            account.clone(),
            ClientAction::Favourite {
                fave: fave.clone(),
                status: status.clone(),
                target_account,
            },
        );
        if let Err(e) = self.workers.enqueue_client_api(ctx, msg).await {
            self.store.delete_fave(&fave.id).await?;
            return Err(e.into());
        }

        Ok(status)
    }

    /// Remove `account`'s fave of a status, if any.
    pub async fn status_unfave(
        &self,
        ctx: &CancellationToken,
        account: &Account,
        status_id: &str,
    ) -> AppResult<Status> {
        let status = self.store.get_status(status_id).await?;
        self.ensure_visible(account, &status).await?;

        let Some(fave) = self.store.find_fave(&account.id, &status.id).await? else {
            return Ok(status);
        };
        if !self.store.delete_fave(&fave.id).await? {
            return Ok(status);
        }

        let target_account = match self.store.get_account(&status.account_id).await {
            Ok(account) => account,
            Err(e) => {
                self.store.put_fave(fave).await?;
                return Err(e);
            }
        };
        let msg = FromClientApi::new(
            account.clone(),
            ClientAction::Unfavourite {
                fave: fave.clone(),
                status: status.clone(),
                target_account,
            },
        );
        // Restore the fave so a retry still finds something to undo.
        if let Err(e) = self.workers.enqueue_client_api(ctx, msg).await {
            self.store.put_fave(fave).await?;
            return Err(e.into());
        }

        Ok(status)
    }

    async fn ensure_visible(&self, account: &Account, status: &Status) -> AppResult<()> {
        if status.account_id == account.id || status.mentions(&account.id) {
            return Ok(());
        }

        let visible = match status.visibility {
            Visibility::Public | Visibility::Unlisted => true,
            Visibility::FollowersOnly => {
                self.store
                    .is_following(&account.id, &status.account_id)
                    .await?
            }
            Visibility::Direct => false,
        };

        if visible {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "status {} is not visible to {}",
                status.id,
                account.acct()
            )))
        }
    }
}
