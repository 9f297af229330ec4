//! Messages for the federator pool: activities received from remote
//! servers, and local activities ready to be delivered.

use murmur_db::entities::Account;
use murmur_federation::Activity;
use url::Url;

/// Work for the federator pool.
#[derive(Debug, Clone)]
pub enum FromFederator {
    /// An activity posted to a local inbox.
    Inbound(InboundActivity),
    /// A local activity to deliver to remote inboxes.
    Outbound(OutboundDelivery),
}

impl FromFederator {
    /// Direction and activity type, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Inbound(inbound) => inbound.activity.kind(),
            Self::Outbound(outbound) => outbound.activity.kind(),
        }
    }
}

/// A received activity with its actor already resolved.
#[derive(Debug, Clone)]
pub struct InboundActivity {
    pub activity: Activity,
    /// The remote account that posted the activity.
    pub requesting_account: Account,
    /// The local account whose inbox received it.
    pub receiving_account: Account,
}

/// A local activity and the inboxes it goes to.
#[derive(Debug, Clone)]
pub struct OutboundDelivery {
    pub activity: Activity,
    /// Local account the activity is sent on behalf of.
    pub actor: Account,
    /// Target inboxes, without duplicates.
    pub inboxes: Vec<Url>,
}
