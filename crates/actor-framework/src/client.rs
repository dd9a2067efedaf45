//! # Generic Client
//!
//! This module defines the generic handle for talking to a store actor.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{Filter, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// The `ResourceClient<T>` is the process-wide handle to a `ResourceActor<T>`. It forwards
/// requests over a Tokio mpsc channel and awaits each answer on a oneshot channel.
///
/// * **Cloneable** – holds only a sender, so cloning is inexpensive.
/// * **Async API** – every method resolves to `Result<…, FrameworkError>`.
/// * **Generic** – works with any entity that implements `ActorEntity`.
#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Applies `update` if the stored version equals `expected` (or unconditionally when `None`).
    pub async fn update(
        &self,
        id: T::Id,
        expected: Option<T::Version>,
        update: T::Update,
    ) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            expected,
            update,
            respond_to,
        })
        .await
    }

    /// Removes the record. `Ok(false)` means there was nothing to remove.
    pub async fn delete(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn lookup(&self, key: T::IndexKey) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Lookup { key, respond_to })
            .await
    }

    /// Keeps only the records for which `keep` returns true. Answers the number removed.
    pub async fn retain(
        &self,
        keep: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<usize, FrameworkError> {
        let keep = Filter::new(keep);
        self.request(|respond_to| ResourceRequest::Retain { keep, respond_to })
            .await
    }
}
