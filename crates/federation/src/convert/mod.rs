//! Conversion between entities and `ActivityPub` types.

mod activity;
mod note;

pub use activity::{
    accept_follow, announce, create_note, delete_status, follow, like, undo_follow, undo_like,
};
pub use note::{addressing, status_to_note, visibility_from_addressing};
