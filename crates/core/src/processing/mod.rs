//! The processor: what happens to messages once a pool hands them over.
//!
//! Entry points, one file each:
//!
//! - [`Processor::process_from_client_api`] for local actions
//! - [`Processor::process_from_federator`] for received activities and outbound deliveries
//! - [`Processor::status_fave`] and [`Processor::status_unfave`], called by API handlers
//! - [`Processor::media_prune`], the admin maintenance trigger

mod admin;
mod client_api;
mod federator;
mod status;

use std::sync::Arc;

use chrono::Utc;
use murmur_common::{AppResult, IdGenerator};
use murmur_db::DynStore;
use murmur_db::entities::{Account, Notification, NotificationKind};
use murmur_federation::{Activity, DynTransport, UriBuilder};
use murmur_queue::{FromClientApi, FromFederator, OutboundDelivery, Workers};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};
use url::Url;

use crate::media::MediaManager;

/// Turns queued messages into storage writes, notifications and deliveries.
///
/// Cheap to clone; every clone shares the same pools, store and maintenance
/// tracker.
#[derive(Clone)]
pub struct Processor {
    store: DynStore,
    transport: DynTransport,
    workers: Arc<Workers>,
    media: Arc<dyn MediaManager>,
    uris: UriBuilder,
    id_gen: IdGenerator,
    maintenance: TaskTracker,
    federation_enabled: bool,
}

impl Processor {
    /// Create a processor. Pools are not started until [`start`](Self::start).
    #[must_use]
    pub fn new(
        store: DynStore,
        transport: DynTransport,
        workers: Arc<Workers>,
        media: Arc<dyn MediaManager>,
        uris: UriBuilder,
    ) -> Self {
        Self {
            store,
            transport,
            workers,
            media,
            uris,
            id_gen: IdGenerator::new(),
            maintenance: TaskTracker::new(),
            federation_enabled: true,
        }
    }

    /// Set whether local actions are federated out.
    #[must_use]
    pub const fn with_federation(mut self, enabled: bool) -> Self {
        self.federation_enabled = enabled;
        self
    }

    #[must_use]
    pub fn workers(&self) -> &Workers {
        &self.workers
    }

    /// Start both pools with this processor as their consumer.
    ///
    /// Errors returned by processing are logged here and the message is
    /// dropped; nothing is retried.
    pub fn start(&self) -> AppResult<()> {
        let processor = self.clone();
        self.workers.client_api.start(move |ctx, msg: FromClientApi| {
            let processor = processor.clone();
            async move {
                let kind = msg.action.kind();
                if let Err(e) = processor.process_from_client_api(&ctx, msg).await {
                    error!(pool = "client_api", kind, error = %e, "Failed to process message");
                }
            }
        })?;

        let processor = self.clone();
        self.workers.federator.start(move |ctx, msg: FromFederator| {
            let processor = processor.clone();
            async move {
                let kind = msg.kind();
                if let Err(e) = processor.process_from_federator(&ctx, msg).await {
                    error!(pool = "federator", kind, error = %e, "Failed to process message");
                }
            }
        })?;

        info!(
            client_api_workers = self.workers.client_api.workers(),
            federator_workers = self.workers.federator.workers(),
            federation = self.federation_enabled,
            "Processor started"
        );
        Ok(())
    }

    /// Drain and stop both pools, then wait for running maintenance jobs.
    pub async fn stop(&self) {
        self.workers.stop().await;
        self.maintenance.close();
        self.maintenance.wait().await;
        info!("Processor stopped");
    }

    /// Number of maintenance jobs still running.
    #[must_use]
    pub fn pending_maintenance(&self) -> usize {
        self.maintenance.len()
    }

    /// Wait until every maintenance job spawned so far has finished.
    pub async fn wait_maintenance(&self) {
        self.maintenance.close();
        self.maintenance.wait().await;
        self.maintenance.reopen();
    }

    /// Store a notification for `target` unless it is remote or the actor
    /// itself.
    async fn notify(
        &self,
        kind: NotificationKind,
        target: &Account,
        origin: &Account,
        status_id: Option<&str>,
    ) -> AppResult<()> {
        if !target.is_local() || target.id == origin.id {
            return Ok(());
        }

        self.store
            .put_notification(Notification {
                id: self.id_gen.generate(),
                kind,
                target_account_id: target.id.clone(),
                origin_account_id: origin.id.clone(),
                status_id: status_id.map(str::to_string),
                created_at: Utc::now(),
            })
            .await
    }

    /// Hand an activity by a local account to the federator pool.
    ///
    /// Only called from outside the federator pool: a federator handler
    /// waiting on its own full queue would never be drained.
    async fn federate<'a>(
        &self,
        ctx: &CancellationToken,
        actor: &Account,
        activity: Activity,
        recipients: impl IntoIterator<Item = &'a Account>,
    ) -> AppResult<()> {
        let Some(outbound) = self.outbound(actor, activity, recipients) else {
            return Ok(());
        };
        self.workers
            .enqueue_federator(ctx, FromFederator::Outbound(outbound))
            .await?;
        Ok(())
    }

    /// Delivery of an activity by a local account to its remote recipients.
    ///
    /// Local and duplicate inboxes are dropped; `None` when no remote inbox
    /// remains or federation is disabled.
    fn outbound<'a>(
        &self,
        actor: &Account,
        activity: Activity,
        recipients: impl IntoIterator<Item = &'a Account>,
    ) -> Option<OutboundDelivery> {
        if !self.federation_enabled || !actor.is_local() {
            return None;
        }

        let inboxes = remote_inboxes(recipients);
        if inboxes.is_empty() {
            debug!(activity_type = activity.kind(), "No remote recipients");
            return None;
        }

        Some(OutboundDelivery {
            activity,
            actor: actor.clone(),
            inboxes,
        })
    }

    /// URI for an activity without an entity of its own.
    fn activity_uri(&self, actor: &Account) -> AppResult<Url> {
        self.uris
            .activity_uri(&actor.username, &self.id_gen.generate())
    }
}

fn remote_inboxes<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Vec<Url> {
    let mut inboxes: Vec<Url> = Vec::new();
    for account in accounts {
        if !account.is_local() && !inboxes.contains(&account.inbox_uri) {
            inboxes.push(account.inbox_uri.clone());
        }
    }
    inboxes
}
