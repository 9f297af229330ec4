//! `ActivityPub` objects.

#![allow(missing_docs)]

mod note;

pub use note::{ApNote, ApTag};
