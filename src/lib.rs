//! # Order Relay
//!
//! Order lifecycle tracking and realtime notification routing for a multi-tenant
//! food-ordering platform.
//!
//! Orders move through `CREATED → ASSIGNED → PREPARING → READY → DISPATCHED → DELIVERED`
//! (or `CANCELLED` from any non-terminal status). Every move is written with an
//! optimistic-concurrency check and then pushed to the live connections that care:
//! the tenant's dispatchers, the assigned cook and dispatcher, the ordering customer.
//!
//! ## Module Tour
//!
//! ### 1. The Stores ([`order_actor`], [`connection_actor`])
//! Two [`ResourceActor`](actor_framework::ResourceActor)s from the `actor-framework` crate.
//! - **Order Store**: keyed by `(tenant, order id)`, version token = current status.
//! - **Connection Registry**: keyed by connection id, indexed by `(tenant, role)` and
//!   `(tenant, user)`, with absolute expiry.
//!
//! ### 2. The Interface ([`clients`])
//! [`OrderStore`](clients::OrderStore) and [`ConnectionRegistry`](clients::ConnectionRegistry)
//! wrap the generic `ResourceClient` and speak the domain error types.
//!
//! ### 3. The Logic ([`engine`], [`router`])
//! - [`OrderLifecycleEngine`](engine::OrderLifecycleEngine): create, transition, read.
//! - [`engine::routing`]: the fixed status → audience table.
//! - [`NotificationRouter`](router::NotificationRouter): best-effort fan-out, aggregated
//!   into a [`DeliveryReport`](router::DeliveryReport).
//!
//! ### 4. The Edges ([`gateway`], [`lifecycle`], [`config`])
//! Connect/disconnect adapter, the [`OrderSystem`](lifecycle::OrderSystem) container, and
//! environment-driven [`Config`](config::Config).
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod connection_actor;
pub mod engine;
pub mod gateway;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod router;
