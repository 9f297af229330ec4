//! Status entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Who may see a status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to everyone and listed on public timelines.
    Public,
    /// Visible to everyone, not listed on public timelines.
    Unlisted,
    /// Visible to accepted followers.
    FollowersOnly,
    /// Visible to mentioned accounts only.
    Direct,
}

/// A status (post) or a boost of another status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,

    /// `ActivityPub` object URI; for boosts this is the Announce activity URI.
    pub uri: Url,

    /// Author account.
    pub account_id: String,

    pub content: String,
    pub visibility: Visibility,

    pub in_reply_to_id: Option<String>,
    pub in_reply_to_account_id: Option<String>,

    /// Set when this status is a boost of another status.
    pub boost_of_id: Option<String>,
    pub boost_of_account_id: Option<String>,

    pub mentioned_account_ids: Vec<String>,

    /// Whether the status was created on this instance.
    pub local: bool,

    pub created_at: DateTime<Utc>,
}

impl Status {
    /// Whether this status is a boost.
    #[must_use]
    pub const fn is_boost(&self) -> bool {
        self.boost_of_id.is_some()
    }

    /// Whether the given account is mentioned by this status.
    #[must_use]
    pub fn mentions(&self, account_id: &str) -> bool {
        self.mentioned_account_ids.iter().any(|id| id == account_id)
    }
}
