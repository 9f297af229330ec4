//! Domain entities.
//!
//! These are the already-resolved models carried inside queue messages, so
//! processing never has to re-read them from storage synchronously.

#![allow(missing_docs)]

mod account;
mod follow;
mod media_attachment;
mod notification;
mod status;
mod status_fave;

pub use account::Account;
pub use follow::Follow;
pub use media_attachment::MediaAttachment;
pub use notification::{Notification, NotificationKind};
pub use status::{Status, Visibility};
pub use status_fave::StatusFave;
