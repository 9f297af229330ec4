//! Admin maintenance.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use murmur_common::{AppError, AppResult};
use murmur_queue::PoolError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::Processor;
use crate::media::MediaManager;

impl Processor {
    /// Prune the media cache.
    ///
    /// Validates `remote_cache_days` and returns; the three prunes run as
    /// separate background jobs that report through the log. A negative
    /// value is rejected before any job starts.
    pub fn media_prune(&self, ctx: &CancellationToken, remote_cache_days: i64) -> AppResult<()> {
        if remote_cache_days < 0 {
            return Err(AppError::BadRequest(format!(
                "invalid value for remote_cache_days prune: value was {remote_cache_days}, cannot be less than 0"
            )));
        }
        let days = u32::try_from(remote_cache_days).map_err(|_| {
            AppError::BadRequest(format!(
                "invalid value for remote_cache_days prune: value was {remote_cache_days}, too large"
            ))
        })?;
        if ctx.is_cancelled() {
            return Err(PoolError::Cancelled.into());
        }

        self.spawn_maintenance("prune_all_remote", move |media| async move {
            media.prune_all_remote(days).await
        });
        self.spawn_maintenance("prune_unused_local_attachments", |media| async move {
            media.prune_unused_local_attachments().await
        });
        self.spawn_maintenance("prune_all_meta", |media| async move {
            media.prune_all_meta().await
        });

        info!(remote_cache_days, "Media prune started");
        Ok(())
    }

    fn spawn_maintenance<F, Fut>(&self, job: &'static str, run: F)
    where
        F: FnOnce(Arc<dyn MediaManager>) -> Fut,
        Fut: Future<Output = AppResult<usize>> + Send + 'static,
    {
        let fut = run(self.media.clone());
        self.maintenance.spawn(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(pruned)) => info!(job, pruned, "Maintenance job finished"),
                Ok(Err(e)) => error!(job, error = %e, "Maintenance job failed"),
                Err(_) => error!(job, "Maintenance job panicked"),
            }
        });
    }
}
