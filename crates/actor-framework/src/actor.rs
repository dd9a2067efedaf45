//! # Generic Store Actor
//!
//! This module defines the `ResourceActor`, the single owner of a keyed table of
//! records. It implements the "Server" side of the Actor Model: requests are
//! processed one at a time, so every read observes every write that was
//! acknowledged before it, and conditional updates are decided without locks.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns a table of records.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the records (`store`),
/// the secondary index (`index`) and the receiver end of the channel.
///
/// **Concurrency Model**:
/// Any number of handler tasks may hold a cloned [`ResourceClient`], but the actor
/// processes their requests *sequentially*. There is no `Mutex` around the table:
/// exclusive ownership inside the task is what makes the optimistic-concurrency
/// check in `Update` atomic with the write that follows it.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Run**: Spawn `actor.run()` in a background task.
/// 3.  **Share**: Clone the client into every component that needs the store.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
///
/// #[derive(Clone, Debug)]
/// struct Note { id: String, owner: String, text: String, rev: u32 }
/// #[derive(Debug)] struct NoteCreate { id: String, owner: String, text: String }
/// #[derive(Debug)] struct NoteUpdate { text: String }
/// #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
///
/// impl ActorEntity for Note {
///     type Id = String;
///     type Create = NoteCreate;
///     type Update = NoteUpdate;
///     type Version = u32;
///     type IndexKey = String;
///     type Error = NoteError;
///
///     fn from_create_params(p: NoteCreate) -> Result<Self, NoteError> {
///         Ok(Self { id: p.id, owner: p.owner, text: p.text, rev: 0 })
///     }
///     fn id(&self) -> String { self.id.clone() }
///     fn version(&self) -> u32 { self.rev }
///     fn index_keys(&self) -> Vec<String> { vec![self.owner.clone()] }
///     fn on_update(&mut self, u: NoteUpdate) -> Result<(), NoteError> {
///         self.text = u.text;
///         self.rev += 1;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Note>::new(10);
///     tokio::spawn(actor.run());
///
///     let note = client
///         .create(NoteCreate { id: "n1".into(), owner: "ana".into(), text: "hi".into() })
///         .await
///         .unwrap();
///     let edited = client
///         .update(note.id.clone(), Some(0), NoteUpdate { text: "hello".into() })
///         .await
///         .unwrap();
///     assert_eq!(edited.rev, 1);
///
///     // A writer still holding revision 0 loses.
///     let stale = client.update("n1".into(), Some(0), NoteUpdate { text: "x".into() }).await;
///     assert!(stale.is_err());
///
///     assert_eq!(client.lookup("ana".into()).await.unwrap().len(), 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: builds the record, replaces any record with the same id, re-indexes it.
/// * **Get**: clones the record out of the table, or `None`.
/// * **Update**: checks the version token, applies `on_update` to a copy, stores the copy.
/// * **Delete**: calls `on_delete`, removes the record and its index entries.
/// * **Lookup**: resolves a secondary key to the records indexed under it.
/// * **Retain**: drops every record the filter rejects.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    index: HashMap<T::IndexKey, HashSet<T::Id>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full,
    /// callers wait until the actor catches up.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            index: HashMap::new(),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing requests until every client is dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Order" instead of "order_relay::model::order::Order")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    match T::from_create_params(params) {
                        Ok(item) => {
                            let id = item.id();
                            let replaced = self.put(item.clone());
                            info!(entity_type, %id, replaced, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    expected,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?expected, ?update, "Update");
                    let _ = respond_to.send(self.apply_update(entity_type, id, expected, update));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        debug!(entity_type, %id, "Nothing to delete");
                        let _ = respond_to.send(Ok(false));
                        continue;
                    };
                    if let Err(e) = item.on_delete() {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Some(removed) = self.store.remove(&id) {
                        self.unindex(&removed);
                    }
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(true));
                }
                ResourceRequest::Lookup { key, respond_to } => {
                    let items: Vec<T> = self
                        .index
                        .get(&key)
                        .into_iter()
                        .flatten()
                        .filter_map(|id| self.store.get(id).cloned())
                        .collect();
                    debug!(entity_type, ?key, hits = items.len(), "Lookup");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Retain { keep, respond_to } => {
                    let doomed: Vec<T::Id> = self
                        .store
                        .iter()
                        .filter(|(_, item)| !keep.matches(item))
                        .map(|(id, _)| id.clone())
                        .collect();
                    for id in &doomed {
                        if let Some(removed) = self.store.remove(id) {
                            self.unindex(&removed);
                        }
                    }
                    if !doomed.is_empty() {
                        info!(entity_type, removed = doomed.len(), size = self.store.len(), "Retained");
                    }
                    let _ = respond_to.send(Ok(doomed.len()));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn apply_update(
        &mut self,
        entity_type: &str,
        id: T::Id,
        expected: Option<T::Version>,
        update: T::Update,
    ) -> Result<T, FrameworkError> {
        let Some(current) = self.store.get(&id) else {
            warn!(entity_type, %id, "Not found");
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        if let Some(expected) = expected {
            let actual = current.version();
            if actual != expected {
                warn!(entity_type, %id, ?expected, ?actual, "Version conflict");
                return Err(FrameworkError::VersionConflict {
                    id: id.to_string(),
                    expected: format!("{expected:?}"),
                    actual: format!("{actual:?}"),
                });
            }
        }

        let mut next = current.clone();
        if let Err(e) = next.on_update(update) {
            warn!(entity_type, %id, error = %e, "Update failed");
            return Err(FrameworkError::EntityError(Box::new(e)));
        }
        self.put(next.clone());
        info!(entity_type, %id, "Updated");
        Ok(next)
    }

    /// Stores `item` under its own id. Returns true when a previous record was replaced.
    fn put(&mut self, item: T) -> bool {
        let id = item.id();
        let previous = self.store.remove(&id);
        if let Some(previous) = &previous {
            self.unindex(previous);
        }
        for key in item.index_keys() {
            self.index.entry(key).or_default().insert(id.clone());
        }
        self.store.insert(id, item);
        previous.is_some()
    }

    fn unindex(&mut self, item: &T) {
        let id = item.id();
        for key in item.index_keys() {
            if let Some(ids) = self.index.get_mut(&key) {
                ids.remove(&id);
                if ids.is_empty() {
                    self.index.remove(&key);
                }
            }
        }
    }
}
