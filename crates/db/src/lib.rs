//! Database layer for murmur.
//!
//! Exposes the domain entities and the [`Store`] interface the processing
//! core persists through. [`MemoryStore`] is the in-process implementation
//! used by the server and the tests.

pub mod entities;
pub mod memory;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use memory::MemoryStore;
pub use store::{DynStore, Store};
