//! # Notification Router
//!
//! Fan-out of one payload to every live connection behind a set of routing keys.
//!
//! Delivery is best-effort and at-most-once per connection per call: a failed lookup
//! or send is written into the [`DeliveryReport`] and the remaining targets are still
//! tried. Nothing is retried and nothing is queued for clients that connect later.

pub mod transport;

pub use transport::*;

use crate::clients::ConnectionRegistry;
use crate::connection_actor::RegistryError;
use crate::model::{ConnectionId, Notification, RoutingKey};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct FailedDelivery {
    pub connection_id: ConnectionId,
    pub error: TransportError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupFailure {
    pub key: RoutingKey,
    pub error: RegistryError,
}

/// Outcome of one dispatch, aggregated after every send has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryReport {
    pub delivered: Vec<ConnectionId>,
    pub failed: Vec<FailedDelivery>,
    /// Keys whose connections could not be resolved at all.
    pub lookup_failures: Vec<LookupFailure>,
}

impl DeliveryReport {
    /// Number of connections a send was attempted on.
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    /// True when nothing was attempted and nothing failed.
    pub fn is_empty(&self) -> bool {
        self.attempted() == 0 && self.lookup_failures.is_empty()
    }

    /// True when every attempted send and every lookup succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.lookup_failures.is_empty()
    }
}

#[derive(Clone)]
pub struct NotificationRouter {
    registry: ConnectionRegistry,
    transport: Arc<dyn Transport>,
}

impl NotificationRouter {
    pub fn new(registry: ConnectionRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Resolves `keys` to live connections and sends `notification` to each once.
    #[instrument(skip(self, notification), fields(kind = ?notification.kind, order_id = %notification.data.order_id))]
    pub async fn dispatch(&self, keys: &[RoutingKey], notification: &Notification) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        let mut seen_keys = HashSet::new();
        let mut seen_connections = HashSet::new();
        let mut targets = Vec::new();
        for key in keys {
            if !seen_keys.insert(key) {
                continue;
            }
            match self.registry.lookup(key).await {
                Ok(connections) => {
                    debug!(%key, hits = connections.len(), "Resolved routing key");
                    for connection_id in connections {
                        if seen_connections.insert(connection_id.clone()) {
                            targets.push(connection_id);
                        }
                    }
                }
                Err(error) => {
                    warn!(%key, %error, "Routing key lookup failed");
                    report.lookup_failures.push(LookupFailure {
                        key: key.clone(),
                        error,
                    });
                }
            }
        }

        let sends = targets.iter().map(|connection_id| async move {
            let result = self.transport.send(connection_id, notification).await;
            (connection_id, result)
        });
        for (connection_id, result) in join_all(sends).await {
            match result {
                Ok(()) => report.delivered.push(connection_id.clone()),
                Err(error) => {
                    warn!(%connection_id, %error, "Delivery failed");
                    report.failed.push(FailedDelivery {
                        connection_id: connection_id.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            lookup_failures = report.lookup_failures.len(),
            "Dispatch complete"
        );
        report
    }
}
