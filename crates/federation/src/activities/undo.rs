//! Undo activity.

use activitypub_federation::kinds::activity::UndoType;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{AnnounceActivity, FollowActivity, LikeActivity};

/// The activity being undone, embedded or referenced by URI.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UndoObject {
    Follow(FollowActivity),
    Like(LikeActivity),
    Announce(AnnounceActivity),
    Reference(Url),
}

impl UndoObject {
    /// URI of the undone activity.
    #[must_use]
    pub const fn id(&self) -> &Url {
        match self {
            Self::Follow(follow) => &follow.id,
            Self::Like(like) => &like.id,
            Self::Announce(announce) => &announce.id,
            Self::Reference(id) => id,
        }
    }
}

/// `ActivityPub` Undo activity.
/// Used to undo a previous activity (unfollow, unfave, unboost).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoActivity {
    #[serde(rename = "type")]
    pub kind: UndoType,
    pub id: Url,
    pub actor: Url,
    pub object: UndoObject,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Url>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Url>,
}

impl UndoActivity {
    /// Create a new Undo activity.
    #[must_use]
    pub const fn new(id: Url, actor: Url, object: UndoObject) -> Self {
        Self {
            kind: UndoType::Undo,
            id,
            actor,
            object,
            to: Vec::new(),
            cc: Vec::new(),
        }
    }
}
