//! Message dispatch for murmur.
//!
//! This crate provides the in-process queues that decouple request handling
//! from side effects:
//!
//! - **Pool**: a generic bounded queue with a fixed worker set
//! - **Messages**: client API actions and federation activities
//! - **Workers**: the client API and federator pools
//!
//! What a worker does with a message is decided by the processor in
//! `murmur-core`, which starts the pools with its own handlers.

pub mod messages;
pub mod pool;
pub mod workers;

pub use messages::{
    ClientAction, FromClientApi, FromFederator, InboundActivity, OutboundDelivery,
};
pub use pool::{DEFAULT_QUEUE_RATIO, PoolError, PoolState, WorkerPool};
pub use workers::Workers;
