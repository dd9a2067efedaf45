//! # System Lifecycle & Orchestration
//!
//! Starts, wires and stops the running system.
//!
//! ## The OrderSystem Pattern
//!
//! 1. **Store Creation** - one [`ResourceActor`](actor_framework::ResourceActor) for orders,
//!    one for connections, each with its client
//! 2. **Wiring** - the registry client is cloned into the router, the gateway and the
//!    sweeper; the order client goes into the engine
//! 3. **Passive Expiry** - a periodic task calls
//!    [`purge_expired`](crate::clients::ConnectionRegistry::purge_expired)
//! 4. **Graceful Shutdown** - see below
//!
//! ## Graceful Shutdown
//!
//! 1. **Stop the sweeper** - it owns a registry client, so it would keep the actor alive
//! 2. **Drop all clients** - closes the sender side of both channels
//! 3. **Actors detect closure** - `receiver.recv()` returns `None` once queued requests
//!    have been answered
//! 4. **Await completion** - both actor tasks finish and log their final table size
//!
//! Tracing is installed by the binary through
//! [`actor_framework::tracing::setup_tracing`].

pub mod order_system;

pub use order_system::*;
