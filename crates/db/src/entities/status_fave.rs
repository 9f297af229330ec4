//! Status fave entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A fave (`Like`) of a status by an account.
///
/// At most one fave exists per `(account_id, status_id)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFave {
    pub id: String,

    /// URI of the `Like` activity.
    pub uri: Url,

    /// Account that faved the status.
    pub account_id: String,

    /// Author of the faved status.
    pub target_account_id: String,

    pub status_id: String,

    pub created_at: DateTime<Utc>,
}
