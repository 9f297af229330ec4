//! Notification entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a notification was created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Favourite,
    Follow,
    FollowRequest,
    Reblog,
    Mention,
}

/// A notification for a local account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,

    /// Account being notified.
    pub target_account_id: String,

    /// Account whose action caused the notification.
    pub origin_account_id: String,

    pub status_id: Option<String>,

    pub created_at: DateTime<Utc>,
}
