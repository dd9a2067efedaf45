//! # ActorClient Trait
//!
//! A common interface for domain-specific clients: point reads and deletes come for
//! free on top of the wrapped `ResourceClient`, already mapped into the domain error.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for domain clients to inherit the standard keyed operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
///
/// #[derive(Clone, Debug)]
/// struct Session { id: String }
/// #[derive(Debug)] struct SessionCreate { id: String }
/// #[derive(Debug, thiserror::Error)]
/// #[error("session store: {0}")]
/// struct SessionError(String);
///
/// impl ActorEntity for Session {
///     type Id = String;
///     type Create = SessionCreate;
///     type Update = ();
///     type Version = ();
///     type IndexKey = ();
///     type Error = SessionError;
///
///     fn from_create_params(p: SessionCreate) -> Result<Self, SessionError> { Ok(Self { id: p.id }) }
///     fn id(&self) -> String { self.id.clone() }
///     fn version(&self) {}
///     fn on_update(&mut self, _: ()) -> Result<(), SessionError> { Ok(()) }
/// }
///
/// struct SessionClient { inner: ResourceClient<Session> }
///
/// #[async_trait::async_trait]
/// impl ActorClient<Session> for SessionClient {
///     type Error = SessionError;
///
///     fn inner(&self) -> &ResourceClient<Session> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> SessionError {
///         SessionError(e.to_string())
///     }
/// }
///
/// async fn usage(client: SessionClient) {
///     // get() and delete() are provided automatically.
///     let _ = client.get("s1".into()).await;
///     let _ = client.delete("s1".into()).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The domain-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by primary key.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete a record by primary key. `Ok(false)` when it was already gone.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<bool, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
