//! # Order Actor
//!
//! The Order Store: a [`ResourceActor<Order>`](actor_framework::ResourceActor) keyed by
//! `(tenant, order id)`, indexed by tenant, with the current status as its version token.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`], the lifecycle error taxonomy
//! - [`state_machine`] - [`OrderStateMachine`], the legal transition graph
//! - [`new()`] - Factory function that creates the actor and client

pub mod entity;
pub mod error;
pub mod state_machine;

pub use error::*;
pub use state_machine::OrderStateMachine;

use crate::clients::OrderStore;
use crate::model::Order;
use actor_framework::ResourceActor;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderStore) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderStore::new(generic_client))
}
