//! # Connection Actor
//!
//! The Connection Registry store: a [`ResourceActor<Connection>`](actor_framework::ResourceActor)
//! keyed by connection id and indexed by [`RoutingKey`](crate::model::RoutingKey), so
//! `(tenant, role)` and `(tenant, user)` lookups are single index hits.
//!
//! Expiry is not enforced here. The [`ConnectionRegistry`] client filters expired
//! records on every read and reclaims them with `Retain` during sweeps.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ConnectionRegistry;
use crate::model::Connection;
use actor_framework::ResourceActor;
use std::time::Duration;

/// Creates a new Connection actor and its registry client.
pub fn new(buffer_size: usize, ttl: Duration) -> (ResourceActor<Connection>, ConnectionRegistry) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, ConnectionRegistry::new(generic_client, ttl))
}
