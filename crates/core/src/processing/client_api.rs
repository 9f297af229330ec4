//! Side effects of actions taken through the client API.

use murmur_common::AppResult;
use murmur_db::entities::{Account, NotificationKind, Status, Visibility};
use murmur_federation::activities::Activity;
use murmur_federation::convert;
use murmur_queue::{ClientAction, FromClientApi};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::Processor;

impl Processor {
    /// Process an action a local account performed through the API.
    ///
    /// Federation side effects are enqueued on the federator pool with `ctx`,
    /// so a full federator queue cannot hold this worker past cancellation.
    pub async fn process_from_client_api(
        &self,
        ctx: &CancellationToken,
        msg: FromClientApi,
    ) -> AppResult<()> {
        let origin = msg.origin_account;
        debug!(account = %origin.acct(), action = msg.action.kind(), "Processing client API message");

        match msg.action {
            ClientAction::CreateStatus(status) => self.create_status(ctx, &origin, &status).await,
            ClientAction::DeleteStatus(status) => self.delete_status(ctx, &origin, &status).await,
            ClientAction::Favourite {
                fave,
                status,
                target_account,
            } => {
                self.notify(
                    NotificationKind::Favourite,
                    &target_account,
                    &origin,
                    Some(&status.id),
                )
                .await?;
                let like = convert::like(&fave, &origin, &status);
                self.federate(ctx, &origin, like, [&target_account]).await
            }
            ClientAction::Unfavourite {
                fave,
                status,
                target_account,
            } => {
                let undo = convert::undo_like(
                    self.activity_uri(&origin)?,
                    &fave,
                    &origin,
                    &status,
                    &target_account,
                );
                self.federate(ctx, &origin, undo, [&target_account]).await
            }
            ClientAction::Follow {
                follow,
                target_account,
            } => {
                let kind = if follow.pending {
                    NotificationKind::FollowRequest
                } else {
                    NotificationKind::Follow
                };
                self.notify(kind, &target_account, &origin, None).await?;
                let activity = convert::follow(&follow, &origin, &target_account);
                self.federate(ctx, &origin, activity, [&target_account])
                    .await
            }
            ClientAction::Unfollow {
                follow,
                target_account,
            } => {
                let undo = convert::undo_follow(
                    self.activity_uri(&origin)?,
                    &follow,
                    &origin,
                    &target_account,
                );
                self.federate(ctx, &origin, undo, [&target_account]).await
            }
            ClientAction::AcceptFollow { follow, follower } => {
                let accept = convert::accept_follow(
                    self.activity_uri(&origin)?,
                    &follow,
                    &follower,
                    &origin,
                );
                self.federate(ctx, &origin, accept, [&follower]).await
            }
            ClientAction::Announce {
                boost,
                boosted,
                target_account,
            } => {
                self.notify(
                    NotificationKind::Reblog,
                    &target_account,
                    &origin,
                    Some(&boosted.id),
                )
                .await?;
                let followers = self.uris.followers_uri(&origin.username)?;
                let (to, mut cc) = convert::addressing(boost.visibility, &followers, &[]);
                cc.push(target_account.uri.clone());
                let announce = convert::announce(&boost, &origin, &boosted, to, cc);
                let mut recipients = self.store.followers(&origin.id).await?;
                recipients.push(target_account);
                self.federate(ctx, &origin, announce, &recipients).await
            }
        }
    }

    /// Accounts a status is delivered to: mentions, the replied-to author and,
    /// unless direct, the author's followers.
    async fn audience(
        &self,
        author: &Account,
        status: &Status,
    ) -> AppResult<(Vec<Account>, Vec<Account>)> {
        let mut mentioned = Vec::with_capacity(status.mentioned_account_ids.len());
        for id in &status.mentioned_account_ids {
            if let Some(account) = self.store.find_account(id).await? {
                mentioned.push(account);
            }
        }

        let mut recipients = mentioned.clone();
        if let Some(id) = &status.in_reply_to_account_id {
            if let Some(account) = self.store.find_account(id).await? {
                recipients.push(account);
            }
        }
        if status.visibility != Visibility::Direct {
            recipients.extend(self.store.followers(&author.id).await?);
        }

        Ok((mentioned, recipients))
    }

    async fn create_status(
        &self,
        ctx: &CancellationToken,
        author: &Account,
        status: &Status,
    ) -> AppResult<()> {
        let (mentioned, recipients) = self.audience(author, status).await?;

        for account in &mentioned {
            self.notify(NotificationKind::Mention, account, author, Some(&status.id))
                .await?;
        }

        let in_reply_to = match &status.in_reply_to_id {
            Some(id) => self.store.find_status(id).await?.map(|s| s.uri),
            None => None,
        };
        let followers = self.uris.followers_uri(&author.username)?;
        let note = convert::status_to_note(status, author, &followers, &mentioned, in_reply_to);
        let create = convert::create_note(self.activity_uri(author)?, note);

        self.federate(ctx, author, create, &recipients).await
    }

    async fn delete_status(
        &self,
        ctx: &CancellationToken,
        author: &Account,
        status: &Status,
    ) -> AppResult<()> {
        let (mentioned, recipients) = self.audience(author, status).await?;

        let followers = self.uris.followers_uri(&author.username)?;
        let mention_uris: Vec<_> = mentioned.iter().map(|a| a.uri.clone()).collect();
        let (to, cc) = convert::addressing(status.visibility, &followers, &mention_uris);
        let delete: Activity =
            convert::delete_status(self.activity_uri(author)?, author, status, to, cc);

        self.federate(ctx, author, delete, &recipients).await
    }
}
