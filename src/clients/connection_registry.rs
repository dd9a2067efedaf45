//! # Connection Registry
//!
//! A routing index over live sessions, not a message queue: it keeps no backlog, and a
//! client that connects after a notification was sent simply misses it.
//!
//! Records carry an absolute `expires_at`. Reads filter expired records out, so a
//! lookup never returns a dead connection even before [`ConnectionRegistry::purge_expired`]
//! has reclaimed it.
use crate::connection_actor::RegistryError;
use crate::model::{Connection, ConnectionCreate, ConnectionId, Role, RoutingKey, TenantId, UserId};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use std::time::Duration;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: ResourceClient<Connection>,
    ttl: Duration,
}

impl ConnectionRegistry {
    pub fn new(inner: ResourceClient<Connection>, ttl: Duration) -> Self {
        Self { inner, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Registers (or re-registers) a connection, live for one TTL from now.
    ///
    /// Safe to retry blindly: a second registration just replaces the first.
    #[instrument(skip(self))]
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        tenant_id: TenantId,
        user_id: UserId,
        role: Role,
    ) -> Result<Connection, RegistryError> {
        if connection_id.is_blank() {
            return Err(RegistryError::Validation("connectionId is required".into()));
        }
        if tenant_id.is_blank() {
            return Err(RegistryError::Validation("tenantId is required".into()));
        }
        if user_id.is_blank() {
            return Err(RegistryError::Validation("userId is required".into()));
        }

        let connected_at = Utc::now();
        let expires_at = TimeDelta::from_std(self.ttl)
            .ok()
            .and_then(|ttl| connected_at.checked_add_signed(ttl))
            .ok_or_else(|| {
                RegistryError::Persistence(format!("TTL {:?} out of range", self.ttl))
            })?;

        let connection = self
            .inner
            .create(ConnectionCreate {
                connection_id,
                tenant_id,
                user_id,
                role,
                connected_at,
                expires_at,
            })
            .await
            .map_err(Self::map_error)?;
        info!(connection_id = %connection.connection_id, %expires_at, "Connection registered");
        Ok(connection)
    }

    /// Best-effort removal. `Ok(false)` when there was nothing to remove.
    #[instrument(skip(self))]
    pub async fn remove(&self, connection_id: &ConnectionId) -> Result<bool, RegistryError> {
        let removed = self
            .inner
            .delete(connection_id.clone())
            .await
            .map_err(Self::map_error)?;
        debug!(removed, "Connection removed");
        Ok(removed)
    }

    /// Live connections reachable under `key`.
    #[instrument(skip(self))]
    pub async fn lookup(&self, key: &RoutingKey) -> Result<Vec<ConnectionId>, RegistryError> {
        let now = Utc::now();
        let connections = self
            .inner
            .lookup(key.clone())
            .await
            .map_err(Self::map_error)?;
        let total = connections.len();
        let live: Vec<ConnectionId> = connections
            .into_iter()
            .filter(|c| c.is_live_at(now))
            .map(|c| c.connection_id)
            .collect();
        debug!(total, live = live.len(), "Lookup");
        Ok(live)
    }

    pub async fn lookup_by_role(
        &self,
        tenant_id: &TenantId,
        role: Role,
    ) -> Result<Vec<ConnectionId>, RegistryError> {
        self.lookup(&RoutingKey::role(tenant_id.clone(), role)).await
    }

    pub async fn lookup_by_user(
        &self,
        tenant_id: &TenantId,
        user_id: &UserId,
    ) -> Result<Vec<ConnectionId>, RegistryError> {
        self.lookup(&RoutingKey::user(tenant_id.clone(), user_id.clone()))
            .await
    }

    /// Physically removes expired records. Returns how many were reclaimed.
    #[instrument(skip(self))]
    pub async fn purge_expired(&self) -> Result<usize, RegistryError> {
        let now = Utc::now();
        let purged = self
            .inner
            .retain(move |c: &Connection| c.is_live_at(now))
            .await
            .map_err(Self::map_error)?;
        if purged > 0 {
            info!(purged, "Expired connections purged");
        }
        Ok(purged)
    }
}

#[async_trait]
impl ActorClient<Connection> for ConnectionRegistry {
    type Error = RegistryError;

    fn inner(&self) -> &ResourceClient<Connection> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        RegistryError::Persistence(e.to_string())
    }
}
