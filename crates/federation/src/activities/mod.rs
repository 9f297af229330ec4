//! `ActivityPub` activity types.

#![allow(missing_docs)]

mod accept;
mod announce;
mod create;
mod delete;
mod follow;
mod like;
mod undo;

pub use accept::{AcceptActivity, AcceptObject};
pub use announce::AnnounceActivity;
pub use create::CreateActivity;
pub use delete::{DeleteActivity, DeleteObject, Tombstone};
pub use follow::FollowActivity;
pub use like::LikeActivity;
pub use undo::{UndoActivity, UndoObject};

use serde::{Deserialize, Serialize};
use url::Url;

/// Any activity this server sends or understands when received.
///
/// Variants are distinguished by their `type` field.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Activity {
    Create(CreateActivity),
    Delete(DeleteActivity),
    Follow(FollowActivity),
    Accept(AcceptActivity),
    Like(LikeActivity),
    Undo(UndoActivity),
    Announce(AnnounceActivity),
}

impl Activity {
    /// The activity URI.
    #[must_use]
    pub const fn id(&self) -> &Url {
        match self {
            Self::Create(a) => &a.id,
            Self::Delete(a) => &a.id,
            Self::Follow(a) => &a.id,
            Self::Accept(a) => &a.id,
            Self::Like(a) => &a.id,
            Self::Undo(a) => &a.id,
            Self::Announce(a) => &a.id,
        }
    }

    /// The actor that performed the activity.
    #[must_use]
    pub const fn actor(&self) -> &Url {
        match self {
            Self::Create(a) => &a.actor,
            Self::Delete(a) => &a.actor,
            Self::Follow(a) => &a.actor,
            Self::Accept(a) => &a.actor,
            Self::Like(a) => &a.actor,
            Self::Undo(a) => &a.actor,
            Self::Announce(a) => &a.actor,
        }
    }

    /// Activity type name, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "Create",
            Self::Delete(_) => "Delete",
            Self::Follow(_) => "Follow",
            Self::Accept(_) => "Accept",
            Self::Like(_) => "Like",
            Self::Undo(_) => "Undo",
            Self::Announce(_) => "Announce",
        }
    }
}

impl From<CreateActivity> for Activity {
    fn from(activity: CreateActivity) -> Self {
        Self::Create(activity)
    }
}

impl From<DeleteActivity> for Activity {
    fn from(activity: DeleteActivity) -> Self {
        Self::Delete(activity)
    }
}

impl From<FollowActivity> for Activity {
    fn from(activity: FollowActivity) -> Self {
        Self::Follow(activity)
    }
}

impl From<AcceptActivity> for Activity {
    fn from(activity: AcceptActivity) -> Self {
        Self::Accept(activity)
    }
}

impl From<LikeActivity> for Activity {
    fn from(activity: LikeActivity) -> Self {
        Self::Like(activity)
    }
}

impl From<UndoActivity> for Activity {
    fn from(activity: UndoActivity) -> Self {
        Self::Undo(activity)
    }
}

impl From<AnnounceActivity> for Activity {
    fn from(activity: AnnounceActivity) -> Self {
        Self::Announce(activity)
    }
}
