//! # Actor Framework
//!
//! Building blocks for keyed in-memory stores that are owned by a single actor task and
//! shared through cheap, cloneable clients. Handlers never lock anything: they send a
//! request, the actor applies it in arrival order, and the answer comes back on a oneshot
//! channel.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - the record type, its id, its version token and
//!    the secondary keys it should be found under
//! 2. **Runtime Layer** ([`ResourceActor`]) - owns the table and the index, processes requests
//! 3. **Interface Layer** ([`ResourceClient`]) - the async handle every component holds
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Phase { Open, Closed }
//!
//! #[derive(Clone, Debug)]
//! struct Ticket { id: u32, team: String, phase: Phase }
//!
//! #[derive(Debug)] struct TicketCreate { id: u32, team: String }
//! #[derive(Debug, thiserror::Error)] #[error("ticket error")] struct TicketError;
//!
//! impl ActorEntity for Ticket {
//!     type Id = u32;
//!     type Create = TicketCreate;
//!     type Update = Phase;
//!     type Version = Phase;
//!     type IndexKey = String;
//!     type Error = TicketError;
//!
//!     fn from_create_params(p: TicketCreate) -> Result<Self, TicketError> {
//!         Ok(Self { id: p.id, team: p.team, phase: Phase::Open })
//!     }
//!     fn id(&self) -> u32 { self.id }
//!     fn version(&self) -> Phase { self.phase.clone() }
//!     fn index_keys(&self) -> Vec<String> { vec![self.team.clone()] }
//!     fn on_update(&mut self, phase: Phase) -> Result<(), TicketError> {
//!         self.phase = phase;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Ticket>::new(10);
//!     tokio::spawn(actor.run());
//!
//!     client.create(TicketCreate { id: 1, team: "ops".into() }).await.unwrap();
//!
//!     // Two writers race from the same observed phase; only the first one lands.
//!     let first = client.update(1, Some(Phase::Open), Phase::Closed).await;
//!     let second = client.update(1, Some(Phase::Open), Phase::Closed).await;
//!     assert!(first.is_ok());
//!     assert!(matches!(second, Err(FrameworkError::VersionConflict { .. })));
//!
//!     assert_eq!(client.lookup("ops".into()).await.unwrap().len(), 1);
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Requests are processed **sequentially** within an actor (no locks needed)
//! - A version check and the write it guards happen in the same step, so a
//!   compare-and-set never interleaves with another writer
//! - Different stores run in **parallel**
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient<T>` from scripted expectations, which
//! is the easy way to make a store fail on purpose. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
