//! Accept activity.

use activitypub_federation::kinds::activity::AcceptType;
use serde::{Deserialize, Serialize};
use url::Url;

use super::FollowActivity;

/// What an Accept refers to: an embedded Follow, or just its URI.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AcceptObject {
    Follow(FollowActivity),
    Reference(Url),
}

impl AcceptObject {
    /// URI of the accepted activity.
    #[must_use]
    pub const fn id(&self) -> &Url {
        match self {
            Self::Follow(follow) => &follow.id,
            Self::Reference(id) => id,
        }
    }
}

/// `ActivityPub` Accept activity.
/// Used to accept a Follow request.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptActivity {
    #[serde(rename = "type")]
    pub kind: AcceptType,
    pub id: Url,
    pub actor: Url,
    /// The original Follow activity being accepted.
    pub object: AcceptObject,
}

impl AcceptActivity {
    /// Create a new Accept activity for an embedded Follow.
    #[must_use]
    pub const fn new(id: Url, actor: Url, follow: FollowActivity) -> Self {
        Self {
            kind: AcceptType::Accept,
            id,
            actor,
            object: AcceptObject::Follow(follow),
        }
    }
}
