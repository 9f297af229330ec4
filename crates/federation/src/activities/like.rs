//! Like activity (fave).

use activitypub_federation::kinds::activity::LikeType;
use serde::{Deserialize, Serialize};
use url::Url;

/// `ActivityPub` Like activity.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeActivity {
    #[serde(rename = "type")]
    pub kind: LikeType,
    pub id: Url,
    pub actor: Url,
    /// The liked note.
    pub object: Url,
}

impl LikeActivity {
    /// Create a new Like activity.
    #[must_use]
    pub const fn new(id: Url, actor: Url, object: Url) -> Self {
        Self {
            kind: LikeType::Like,
            id,
            actor,
            object,
        }
    }
}
