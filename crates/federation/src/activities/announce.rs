//! Announce activity.

use activitypub_federation::kinds::activity::AnnounceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// `ActivityPub` Announce activity.
/// Used to boost a status.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnounceActivity {
    #[serde(rename = "type")]
    pub kind: AnnounceType,
    pub id: Url,
    pub actor: Url,
    /// The boosted note.
    pub object: Url,
    pub published: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Url>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Url>,
}

impl AnnounceActivity {
    /// Create a new Announce activity.
    #[must_use]
    pub const fn new(id: Url, actor: Url, object: Url, published: DateTime<Utc>) -> Self {
        Self {
            kind: AnnounceType::Announce,
            id,
            actor,
            object,
            published,
            to: Vec::new(),
            cc: Vec::new(),
        }
    }
}
