//! The two long-lived pools of the process.

use murmur_common::config::WorkersConfig;
use tokio_util::sync::CancellationToken;

use crate::messages::{FromClientApi, FromFederator};
use crate::pool::{PoolError, WorkerPool};

/// Client API and federator pools.
///
/// Producers hand work to the processor only through these.
pub struct Workers {
    pub client_api: WorkerPool<FromClientApi>,
    pub federator: WorkerPool<FromFederator>,
}

impl Workers {
    /// Create both pools, not yet started.
    #[must_use]
    pub fn new(config: &WorkersConfig) -> Self {
        Self {
            client_api: WorkerPool::new(
                "client_api",
                config.client_api_workers,
                config.client_api_queue_size,
            ),
            federator: WorkerPool::new(
                "federator",
                config.federator_workers,
                config.federator_queue_size,
            ),
        }
    }

    pub async fn enqueue_client_api(
        &self,
        ctx: &CancellationToken,
        msg: FromClientApi,
    ) -> Result<(), PoolError> {
        self.client_api.enqueue(ctx, msg).await
    }

    pub async fn enqueue_federator(
        &self,
        ctx: &CancellationToken,
        msg: FromFederator,
    ) -> Result<(), PoolError> {
        self.federator.enqueue(ctx, msg).await
    }

    /// Stop both pools.
    ///
    /// The client API pool goes first: draining it may still enqueue
    /// federation work, which the federator pool then drains in turn.
    pub async fn stop(&self) {
        self.client_api.stop().await;
        self.federator.stop().await;
    }
}
