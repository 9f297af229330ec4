//! Account entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A local or remote account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,

    /// Username without the domain part.
    pub username: String,

    /// Domain of a remote account; `None` for local accounts.
    pub domain: Option<String>,

    /// `ActivityPub` actor URI.
    pub uri: Url,

    /// Inbox that activities addressed to this account are delivered to.
    pub inbox_uri: Url,

    /// Whether follows must be approved manually.
    pub locked: bool,

    /// Whether the account may use admin endpoints.
    pub admin: bool,

    pub avatar_media_attachment_id: Option<String>,
    pub header_media_attachment_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account lives on this instance.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.domain.is_none()
    }

    /// `user` for local accounts, `user@domain` for remote ones.
    #[must_use]
    pub fn acct(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{}@{domain}", self.username),
            None => self.username.clone(),
        }
    }

    /// Whether the given attachment is this account's avatar or header.
    #[must_use]
    pub fn uses_attachment(&self, attachment_id: &str) -> bool {
        self.avatar_media_attachment_id.as_deref() == Some(attachment_id)
            || self.header_media_attachment_id.as_deref() == Some(attachment_id)
    }
}
