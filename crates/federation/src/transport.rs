//! Outbound activity delivery.
//!
//! A [`Transport`] posts one activity to one remote inbox. Fan-out across
//! inboxes and failure accounting live in the federator worker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use murmur_common::AppError;
use reqwest::{Client, StatusCode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::activities::Activity;

/// Shared handle to a transport implementation.
pub type DynTransport = Arc<dyn Transport>;

const ACTIVITY_CONTENT_TYPE: &str = "application/activity+json";

/// Error type for delivery.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Delivery failed: {status} - {body}")]
    DeliveryFailed { status: u16, body: String },
    #[error("Failed to serialize activity: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        Self::Federation(err.to_string())
    }
}

/// Delivers activities to remote inboxes.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Deliver `activity` to `inbox`.
    ///
    /// `ctx` is the context of the message being processed. Whether a
    /// cancelled context cuts a delivery short is up to the implementation.
    async fn deliver(
        &self,
        ctx: &CancellationToken,
        activity: &Activity,
        inbox: &Url,
    ) -> Result<(), TransportError>;
}

/// Transport posting activities over HTTP.
///
/// Requests are bounded by the client timeout, not by `ctx`: pools cancel
/// the processing context when they start draining, and drained deliveries
/// must still go out.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given user agent and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(
        &self,
        ctx: &CancellationToken,
        activity: &Activity,
        inbox: &Url,
    ) -> Result<(), TransportError> {
        let body = serde_json::to_vec(activity)?;

        debug!(
            inbox = %inbox,
            activity_type = activity.kind(),
            shutting_down = ctx.is_cancelled(),
            "Delivering activity"
        );

        let response = self
            .client
            .post(inbox.clone())
            .header("Content-Type", ACTIVITY_CONTENT_TYPE)
            .header("Accept", "application/activity+json, application/ld+json")
            .body(body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            debug!(inbox = %inbox, status = %status, "Activity delivered");
            Ok(())
        } else if status == StatusCode::GONE {
            // Actor deleted on the remote side; nothing left to deliver to.
            warn!(inbox = %inbox, "Remote actor is gone (410)");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(TransportError::DeliveryFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}

/// Transport used when federation is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpTransport;

#[async_trait]
impl Transport for NoOpTransport {
    async fn deliver(
        &self,
        _ctx: &CancellationToken,
        activity: &Activity,
        inbox: &Url,
    ) -> Result<(), TransportError> {
        debug!(inbox = %inbox, activity_type = activity.kind(), "Federation disabled, dropping delivery");
        Ok(())
    }
}
