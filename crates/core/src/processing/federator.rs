//! Received activities and outbound deliveries.
//!
//! Every inbound message is handled on its own: the only state shared with
//! concurrently processed messages is the store, which serializes
//! conflicting writes.

use chrono::Utc;
use futures::future::join_all;
use murmur_common::{AppError, AppResult};
use murmur_db::entities::{Account, Follow, NotificationKind, Status, StatusFave};
use murmur_federation::activities::{
    AcceptActivity, Activity, AnnounceActivity, CreateActivity, DeleteActivity, FollowActivity,
    LikeActivity, UndoActivity, UndoObject,
};
use murmur_federation::convert;
use murmur_queue::{FromFederator, InboundActivity, OutboundDelivery};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use super::Processor;

impl Processor {
    /// Process a message from the federator pool.
    pub async fn process_from_federator(
        &self,
        ctx: &CancellationToken,
        msg: FromFederator,
    ) -> AppResult<()> {
        match msg {
            FromFederator::Inbound(inbound) => self.process_inbound(ctx, inbound).await,
            FromFederator::Outbound(outbound) => self.deliver(ctx, outbound).await,
        }
    }

    async fn process_inbound(
        &self,
        ctx: &CancellationToken,
        inbound: InboundActivity,
    ) -> AppResult<()> {
        let InboundActivity {
            activity,
            requesting_account: requester,
            receiving_account,
        } = inbound;

        if activity.actor() != &requester.uri {
            return Err(AppError::Forbidden(format!(
                "activity actor {} does not match requesting account {}",
                activity.actor(),
                requester.uri
            )));
        }

        debug!(
            activity_type = activity.kind(),
            actor = %requester.uri,
            inbox = %receiving_account.acct(),
            "Processing inbound activity"
        );

        match activity {
            Activity::Create(create) => self.inbound_create(&requester, create).await,
            Activity::Like(like) => self.inbound_like(&requester, like).await,
            Activity::Follow(follow) => self.inbound_follow(ctx, &requester, follow).await,
            Activity::Accept(accept) => self.inbound_accept(&requester, accept).await,
            Activity::Announce(announce) => self.inbound_announce(&requester, announce).await,
            Activity::Undo(undo) => self.inbound_undo(&requester, undo).await,
            Activity::Delete(delete) => self.inbound_delete(&requester, delete).await,
        }
    }

    async fn inbound_create(&self, requester: &Account, create: CreateActivity) -> AppResult<()> {
        let note = create.object;
        if note.attributed_to != requester.uri {
            return Err(AppError::Forbidden(format!(
                "note {} is not attributed to {}",
                note.id, requester.uri
            )));
        }
        if self.store.find_status_by_uri(&note.id).await?.is_some() {
            debug!(uri = %note.id, "Status already known");
            return Ok(());
        }

        let replied_to = match &note.in_reply_to {
            Some(uri) => self.store.find_status_by_uri(uri).await?,
            None => None,
        };

        let mut mentioned = Vec::new();
        for uri in note.mentioned() {
            if let Some(account) = self.store.find_account_by_uri(uri).await? {
                mentioned.push(account);
            }
        }

        let status = Status {
            id: self.id_gen.generate(),
            uri: note.id.clone(),
            account_id: requester.id.clone(),
            content: note.content.clone(),
            visibility: convert::visibility_from_addressing(&note.to, &note.cc),
            in_reply_to_id: replied_to.as_ref().map(|s| s.id.clone()),
            in_reply_to_account_id: replied_to.as_ref().map(|s| s.account_id.clone()),
            boost_of_id: None,
            boost_of_account_id: None,
            mentioned_account_ids: mentioned.iter().map(|a| a.id.clone()).collect(),
            local: false,
            created_at: note.published,
        };
        // A concurrent redelivery may have stored it since the check above.
        if !self.put_remote_status(status.clone()).await? {
            return Ok(());
        }

        if let Some(replied_to) = &replied_to {
            if !status.mentions(&replied_to.account_id) {
                if let Some(author) = self.store.find_account(&replied_to.account_id).await? {
                    mentioned.push(author);
                }
            }
        }
        for account in &mentioned {
            self.notify(NotificationKind::Mention, account, requester, Some(&status.id))
                .await?;
        }

        Ok(())
    }

    /// Store a received status. Returns `false` if its URI is already known.
    async fn put_remote_status(&self, status: Status) -> AppResult<bool> {
        let uri = status.uri.clone();
        match self.store.put_status(status).await {
            Ok(()) => Ok(true),
            Err(AppError::Conflict(_)) => {
                debug!(uri = %uri, "Status already known");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn inbound_like(&self, requester: &Account, like: LikeActivity) -> AppResult<()> {
        let status = self
            .store
            .find_status_by_uri(&like.object)
            .await?
            .ok_or_else(|| AppError::StatusNotFound(like.object.to_string()))?;

        let fave = StatusFave {
            id: self.id_gen.generate(),
            uri: like.id,
            account_id: requester.id.clone(),
            target_account_id: status.account_id.clone(),
            status_id: status.id.clone(),
            created_at: Utc::now(),
        };
        if !self.store.put_fave(fave).await? {
            debug!(status_id = %status.id, "Fave already recorded");
            return Ok(());
        }

        let author = self.store.get_account(&status.account_id).await?;
        self.notify(NotificationKind::Favourite, &author, requester, Some(&status.id))
            .await
    }

    async fn inbound_follow(
        &self,
        ctx: &CancellationToken,
        requester: &Account,
        activity: FollowActivity,
    ) -> AppResult<()> {
        let target = self
            .store
            .find_account_by_uri(&activity.object)
            .await?
            .filter(Account::is_local)
            .ok_or_else(|| AppError::AccountNotFound(activity.object.to_string()))?;

        let follow = Follow {
            id: self.id_gen.generate(),
            uri: activity.id,
            account_id: requester.id.clone(),
            target_account_id: target.id.clone(),
            pending: target.locked,
            created_at: Utc::now(),
        };

        if !self.store.put_follow(follow.clone()).await? {
            // Re-sent follow: answer again if it was already accepted.
            let existing = self
                .store
                .find_follow(&requester.id, &target.id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("follow of {}", target.id)))?;
            if existing.pending {
                return Ok(());
            }
            return self.accept(ctx, &existing, requester, &target).await;
        }

        if follow.pending {
            return self
                .notify(NotificationKind::FollowRequest, &target, requester, None)
                .await;
        }

        self.notify(NotificationKind::Follow, &target, requester, None)
            .await?;
        self.accept(ctx, &follow, requester, &target).await
    }

    /// Deliver the Accept from this worker rather than through the
    /// federator queue, which this handler may be blocking.
    async fn accept(
        &self,
        ctx: &CancellationToken,
        follow: &Follow,
        follower: &Account,
        target: &Account,
    ) -> AppResult<()> {
        let accept = convert::accept_follow(self.activity_uri(target)?, follow, follower, target);
        match self.outbound(target, accept, [follower]) {
            Some(outbound) => self.deliver(ctx, outbound).await,
            None => Ok(()),
        }
    }

    async fn inbound_accept(&self, requester: &Account, accept: AcceptActivity) -> AppResult<()> {
        let uri = accept.object.id();
        let mut follow = self
            .store
            .find_follow_by_uri(uri)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("follow {uri}")))?;

        if follow.target_account_id != requester.id {
            return Err(AppError::Forbidden(format!(
                "{} cannot accept follow {uri}",
                requester.uri
            )));
        }
        if !follow.pending {
            return Ok(());
        }

        follow.pending = false;
        self.store.update_follow(follow).await
    }

    async fn inbound_announce(
        &self,
        requester: &Account,
        announce: AnnounceActivity,
    ) -> AppResult<()> {
        if self.store.find_status_by_uri(&announce.id).await?.is_some() {
            debug!(uri = %announce.id, "Boost already known");
            return Ok(());
        }

        let boosted = self
            .store
            .find_status_by_uri(&announce.object)
            .await?
            .ok_or_else(|| AppError::StatusNotFound(announce.object.to_string()))?;

        let boost = Status {
            id: self.id_gen.generate(),
            uri: announce.id.clone(),
            account_id: requester.id.clone(),
            content: String::new(),
            visibility: convert::visibility_from_addressing(&announce.to, &announce.cc),
            in_reply_to_id: None,
            in_reply_to_account_id: None,
            boost_of_id: Some(boosted.id.clone()),
            boost_of_account_id: Some(boosted.account_id.clone()),
            mentioned_account_ids: Vec::new(),
            local: false,
            created_at: announce.published,
        };
        if !self.put_remote_status(boost).await? {
            return Ok(());
        }

        let author = self.store.get_account(&boosted.account_id).await?;
        self.notify(NotificationKind::Reblog, &author, requester, Some(&boosted.id))
            .await
    }

    async fn inbound_undo(&self, requester: &Account, undo: UndoActivity) -> AppResult<()> {
        let uri = undo.object.id();

        if let Some(follow) = self.find_undone_follow(requester, &undo.object).await? {
            ensure_owner(requester, &follow.account_id, uri)?;
            self.store.delete_follow(&follow.id).await?;
            debug!(follow_id = %follow.id, "Follow undone");
            return Ok(());
        }

        if let Some(fave) = self.find_undone_fave(requester, &undo.object).await? {
            ensure_owner(requester, &fave.account_id, uri)?;
            self.store.delete_fave(&fave.id).await?;
            debug!(fave_id = %fave.id, "Fave undone");
            return Ok(());
        }

        if let Some(boost) = self
            .store
            .find_status_by_uri(uri)
            .await?
            .filter(Status::is_boost)
        {
            ensure_owner(requester, &boost.account_id, uri)?;
            self.store.delete_status(&boost.id).await?;
            debug!(status_id = %boost.id, "Boost undone");
            return Ok(());
        }

        debug!(uri = %uri, "Nothing to undo");
        Ok(())
    }

    /// Follow referenced by an Undo, by URI or by (actor, object) for an
    /// embedded Follow.
    async fn find_undone_follow(
        &self,
        requester: &Account,
        object: &UndoObject,
    ) -> AppResult<Option<Follow>> {
        if let Some(follow) = self.store.find_follow_by_uri(object.id()).await? {
            return Ok(Some(follow));
        }
        let UndoObject::Follow(follow) = object else {
            return Ok(None);
        };
        match self.store.find_account_by_uri(&follow.object).await? {
            Some(target) => self.store.find_follow(&requester.id, &target.id).await,
            None => Ok(None),
        }
    }

    /// Fave referenced by an Undo, by URI or by (actor, object) for an
    /// embedded Like.
    async fn find_undone_fave(
        &self,
        requester: &Account,
        object: &UndoObject,
    ) -> AppResult<Option<StatusFave>> {
        if let Some(fave) = self.store.find_fave_by_uri(object.id()).await? {
            return Ok(Some(fave));
        }
        let UndoObject::Like(like) = object else {
            return Ok(None);
        };
        match self.store.find_status_by_uri(&like.object).await? {
            Some(status) => self.store.find_fave(&requester.id, &status.id).await,
            None => Ok(None),
        }
    }

    async fn inbound_delete(&self, requester: &Account, delete: DeleteActivity) -> AppResult<()> {
        let uri = delete.object.id();

        if uri == &requester.uri {
            let statuses = self.store.statuses_by_account(&requester.id).await?;
            let count = statuses.len();
            for status in statuses {
                self.store.delete_status(&status.id).await?;
            }
            info!(account = %requester.acct(), deleted = count, "Deleted statuses of removed account");
            return Ok(());
        }

        let Some(status) = self.store.find_status_by_uri(uri).await? else {
            debug!(uri = %uri, "Deleted object not known");
            return Ok(());
        };
        ensure_owner(requester, &status.account_id, uri)?;
        self.store.delete_status(&status.id).await?;
        Ok(())
    }

    /// Deliver to every inbox concurrently.
    ///
    /// Fails if any delivery failed. Failed inboxes are logged and not
    /// retried.
    async fn deliver(&self, ctx: &CancellationToken, outbound: OutboundDelivery) -> AppResult<()> {
        let OutboundDelivery {
            activity,
            actor,
            inboxes,
        } = outbound;

        let results = join_all(inboxes.iter().map(|inbox| {
            let activity = &activity;
            async move { (inbox, self.transport.deliver(ctx, activity, inbox).await) }
        }))
        .await;

        let mut failed = 0;
        for (inbox, result) in results {
            if let Err(e) = result {
                warn!(
                    inbox = %inbox,
                    activity_type = activity.kind(),
                    actor = %actor.acct(),
                    error = %e,
                    "Delivery failed"
                );
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(AppError::Federation(format!(
                "{failed} of {} deliveries of {} failed",
                inboxes.len(),
                activity.id()
            )));
        }

        debug!(
            activity_type = activity.kind(),
            inboxes = inboxes.len(),
            "Activity delivered"
        );
        Ok(())
    }
}

fn ensure_owner(requester: &Account, owner_id: &str, uri: &Url) -> AppResult<()> {
    if requester.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "{} does not own {uri}",
            requester.uri
        )))
    }
}
