//! Delivery transport: the outbound half of a live connection.
//!
//! The router calls [`Transport::send`] once per target connection. An unreachable
//! peer is an ordinary `Err`, never a panic: stale connections are expected.

use crate::model::{ConnectionId, Notification};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Why a single send failed. Recorded in the delivery report, never propagated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The peer is no longer attached.
    #[error("connection {0} is gone")]
    Gone(ConnectionId),

    /// The peer is attached but could not take the message.
    #[error("send to {connection_id} failed: {reason}")]
    Failed {
        connection_id: ConnectionId,
        reason: String,
    },
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), TransportError>;
}

/// Outbound buffer per attached connection.
const CONNECTION_BUFFER: usize = 64;

/// In-process transport: every attached connection gets an mpsc receiver.
///
/// Used by the demo binary and by tests to observe exactly what each client got.
#[derive(Clone, Default)]
pub struct ChannelTransport {
    /// connection_id → outbound sender
    peers: Arc<DashMap<ConnectionId, mpsc::Sender<Notification>>>,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a peer and returns the stream it will receive on.
    /// Re-attaching an id replaces the previous stream.
    pub fn attach(&self, connection_id: ConnectionId) -> mpsc::Receiver<Notification> {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);
        self.peers.insert(connection_id, tx);
        rx
    }

    pub fn detach(&self, connection_id: &ConnectionId) -> bool {
        self.peers.remove(connection_id).is_some()
    }

    pub fn attached(&self) -> usize {
        self.peers.len()
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), TransportError> {
        // The read guard must be gone before `remove` below, or the shard deadlocks.
        let sender = self
            .peers
            .get(connection_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TransportError::Gone(connection_id.clone()))?;

        match sender.try_send(notification.clone()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.peers.remove(connection_id);
                Err(TransportError::Gone(connection_id.clone()))
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(TransportError::Failed {
                connection_id: connection_id.clone(),
                reason: "outbound buffer full".into(),
            }),
        }
    }
}
