//! Transport double recording deliveries instead of sending them.

#![allow(clippy::unwrap_used, missing_docs)]

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::activities::Activity;
use crate::transport::{Transport, TransportError};

/// A delivery recorded by [`RecordingTransport`].
#[derive(Clone, Debug)]
pub struct Delivery {
    pub activity: Activity,
    pub inbox: Url,
    /// Whether the processing context was already cancelled.
    pub cancelled: bool,
}

/// Records every delivery; inboxes registered with [`fail_for`](Self::fail_for)
/// fail with a 503.
#[derive(Default)]
pub struct RecordingTransport {
    deliveries: Mutex<Vec<Delivery>>,
    failing: Mutex<HashSet<Url>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, inbox: Url) {
        self.failing.lock().unwrap().insert(inbox);
    }

    /// Successful deliveries so far.
    #[must_use]
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn deliver(
        &self,
        ctx: &CancellationToken,
        activity: &Activity,
        inbox: &Url,
    ) -> Result<(), TransportError> {
        if self.failing.lock().unwrap().contains(inbox) {
            return Err(TransportError::DeliveryFailed {
                status: 503,
                body: String::new(),
            });
        }
        self.deliveries.lock().unwrap().push(Delivery {
            activity: activity.clone(),
            inbox: inbox.clone(),
            cancelled: ctx.is_cancelled(),
        });
        Ok(())
    }
}
