//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).

pub mod connection_registry;
pub mod order_store;

pub use connection_registry::*;
pub use order_store::*;
