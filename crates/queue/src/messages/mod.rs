//! Messages carried by the worker pools.
//!
//! Messages are moved into a pool on enqueue and out of it into the
//! processor; nothing holds on to them in between.

mod client_api;
mod federator;

pub use client_api::{ClientAction, FromClientApi};
pub use federator::{FromFederator, InboundActivity, OutboundDelivery};
