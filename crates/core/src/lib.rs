//! Core processing for murmur.
//!
//! The [`Processor`] consumes both worker pools and owns the operations API
//! handlers call directly (status faves, media prune). The [`media`] module
//! holds the maintenance operations the prune jobs run.

pub mod media;
pub mod processing;

pub use media::{MediaManager, StoreMediaManager};
pub use processing::Processor;
