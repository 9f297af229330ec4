//! Follow entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A follow relationship, possibly still waiting for approval.
///
/// At most one follow exists per `(account_id, target_account_id)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: String,

    /// URI of the `Follow` activity.
    pub uri: Url,

    /// Follower.
    pub account_id: String,

    /// Followee.
    pub target_account_id: String,

    /// `true` until the followee accepts.
    pub pending: bool,

    pub created_at: DateTime<Utc>,
}
