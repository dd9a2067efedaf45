//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every stored record (an order, a live
//! connection, ...) implements to be kept by the generic `ResourceActor`. It names the
//! record's key, its creation and update payloads, the version token used for
//! conditional writes, and the secondary index keys the actor maintains for it.
//!
//! # Identity
//! Entities carry their own identity. The actor never invents ids: whoever builds the
//! `Create` payload decides the key (a fresh UUID, a transport-supplied connection id),
//! and [`ActorEntity::id`] reads it back when the record is stored.
//!
//! # Optimistic Concurrency
//! [`ActorEntity::version`] exposes a token that changes on every meaningful write.
//! An `Update` request may carry the token the caller last observed; the actor
//! compares it against the stored record before applying the update and rejects
//! the write with [`FrameworkError::VersionConflict`](crate::FrameworkError::VersionConflict)
//! on mismatch. Because the actor processes one request at a time, at most one
//! writer wins per token generation.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::index_keys`] defaults to no secondary keys.
//! - [`ActorEntity::on_delete`] defaults to `Ok(())`.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any stored record must implement to be managed by `ResourceActor`.
///
/// # Architecture Note
/// By defining one contract for every record type, the `ResourceActor` request loop
/// is written *once* and reused for orders and connections alike. Associated types
/// keep each store strongly typed: an order store only accepts `OrderCreate`
/// payloads and a connection store only accepts `ConnectionCreate` payloads.
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The primary key (e.g. a tenant-scoped order key, a connection id).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Token compared by conditional updates.
    /// Use `()` for records that are only ever replaced wholesale.
    type Version: PartialEq + Send + Sync + Debug;

    /// Secondary index key. Each record may be reachable under several keys.
    type IndexKey: Eq + Hash + Clone + Send + Sync + Debug;

    /// The error type for this entity.
    ///
    /// # Design Note: Error Granularity
    ///
    /// The framework enforces a **per-entity error type** (one enum for the whole store)
    /// rather than one error type per request. Clients deal with a single error type,
    /// which keeps pattern matching at the call site simple.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the full record from its creation payload.
    fn from_create_params(params: Self::Create) -> Result<Self, Self::Error>;

    /// The record's primary key.
    fn id(&self) -> Self::Id;

    /// The record's current version token.
    fn version(&self) -> Self::Version;

    /// Secondary index keys this record is reachable under.
    fn index_keys(&self) -> Vec<Self::IndexKey> {
        Vec::new()
    }

    /// Apply an update to the record. Called only after the version check passed.
    ///
    /// The actor works on a copy: if this returns an error the stored record is
    /// left exactly as it was.
    fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;

    /// Called immediately before the record is removed from the store.
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}
