//! Media attachment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// A media file attached to a status, or used as an avatar/header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub id: String,

    /// Owning account.
    pub account_id: String,

    /// Status the attachment belongs to, if any.
    pub status_id: Option<String>,

    /// Origin of a remote attachment; `None` for local uploads.
    pub remote_url: Option<Url>,

    /// Storage key of the full-size file.
    pub file_key: String,

    /// Storage key of the thumbnail.
    pub thumbnail_key: String,

    /// Whether the files are currently present in storage.
    pub cached: bool,

    pub avatar: bool,
    pub header: bool,

    pub created_at: DateTime<Utc>,
}

impl MediaAttachment {
    /// Whether this attachment was fetched from a remote instance.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote_url.is_some()
    }

    /// Whether this is an avatar or header rather than status media.
    #[must_use]
    pub const fn is_meta(&self) -> bool {
        self.avatar || self.header
    }
}
