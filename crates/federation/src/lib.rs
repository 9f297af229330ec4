//! `ActivityPub` federation for murmur.
//!
//! This crate holds the wire side of federation:
//!
//! - **Activities**: Create, Delete, Follow, Accept, Like, Undo, Announce
//! - **Objects**: Note
//! - **Conversion**: statuses, faves and follows to activities, with addressing
//! - **Transport**: delivery of activities to remote inboxes
//!
//! Deciding *what* to send and applying what was received is done by the
//! processor in `murmur-core`.

pub mod activities;
pub mod convert;
pub mod objects;
pub mod transport;
pub mod uris;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use activities::Activity;
pub use objects::ApNote;
pub use transport::{DynTransport, HttpTransport, NoOpTransport, Transport, TransportError};
pub use uris::UriBuilder;
