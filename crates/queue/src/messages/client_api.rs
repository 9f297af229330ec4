//! Messages describing actions local accounts performed through the API.

use murmur_db::entities::{Account, Follow, Status, StatusFave};

/// An action by a local account that has side effects beyond storage.
///
/// Carries the already-resolved entities so processing does not re-read them.
#[derive(Debug, Clone)]
pub struct FromClientApi {
    /// Account that performed the action.
    pub origin_account: Account,
    pub action: ClientAction,
}

/// What the origin account did.
#[derive(Debug, Clone)]
pub enum ClientAction {
    /// A status was created.
    CreateStatus(Status),
    /// A status was deleted.
    DeleteStatus(Status),
    /// A status was faved.
    Favourite {
        fave: StatusFave,
        status: Status,
        target_account: Account,
    },
    /// A fave was removed.
    Unfavourite {
        fave: StatusFave,
        status: Status,
        target_account: Account,
    },
    /// A follow was requested.
    Follow {
        follow: Follow,
        target_account: Account,
    },
    /// A follow was withdrawn.
    Unfollow {
        follow: Follow,
        target_account: Account,
    },
    /// A pending follow of the origin account was accepted.
    AcceptFollow { follow: Follow, follower: Account },
    /// A status was boosted.
    Announce {
        boost: Status,
        boosted: Status,
        target_account: Account,
    },
}

impl ClientAction {
    /// Action name, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CreateStatus(_) => "create_status",
            Self::DeleteStatus(_) => "delete_status",
            Self::Favourite { .. } => "favourite",
            Self::Unfavourite { .. } => "unfavourite",
            Self::Follow { .. } => "follow",
            Self::Unfollow { .. } => "unfollow",
            Self::AcceptFollow { .. } => "accept_follow",
            Self::Announce { .. } => "announce",
        }
    }
}

impl FromClientApi {
    #[must_use]
    pub const fn new(origin_account: Account, action: ClientAction) -> Self {
        Self {
            origin_account,
            action,
        }
    }
}
