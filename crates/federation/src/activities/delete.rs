//! Delete activity.

use activitypub_federation::kinds::{activity::DeleteType, object::TombstoneType};
use serde::{Deserialize, Serialize};
use url::Url;

/// Tombstone left in place of a deleted object.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Tombstone {
    #[serde(rename = "type")]
    pub kind: TombstoneType,
    pub id: Url,
}

/// What a Delete refers to: a tombstone or a bare URI.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DeleteObject {
    Tombstone(Tombstone),
    Reference(Url),
}

impl DeleteObject {
    /// URI of the deleted object.
    #[must_use]
    pub const fn id(&self) -> &Url {
        match self {
            Self::Tombstone(tombstone) => &tombstone.id,
            Self::Reference(id) => id,
        }
    }
}

/// `ActivityPub` Delete activity.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteActivity {
    #[serde(rename = "type")]
    pub kind: DeleteType,
    pub id: Url,
    pub actor: Url,
    pub object: DeleteObject,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Url>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Url>,
}

impl DeleteActivity {
    /// Create a new Delete activity leaving a tombstone for `object`.
    #[must_use]
    pub const fn new(id: Url, actor: Url, object: Url) -> Self {
        Self {
            kind: DeleteType::Delete,
            id,
            actor,
            object: DeleteObject::Tombstone(Tombstone {
                kind: TombstoneType::Tombstone,
                id: object,
            }),
            to: Vec::new(),
            cc: Vec::new(),
        }
    }
}
