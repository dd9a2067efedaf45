//! Entity trait implementation for [`Connection`].

use crate::connection_actor::RegistryError;
use crate::model::{Connection, ConnectionCreate, ConnectionId, RoutingKey};
use actor_framework::ActorEntity;

impl ActorEntity for Connection {
    type Id = ConnectionId;
    type Create = ConnectionCreate;
    /// Connections are never edited: reconnecting registers a fresh record.
    type Update = ();
    type Version = ();
    type IndexKey = RoutingKey;
    type Error = RegistryError;

    fn from_create_params(params: ConnectionCreate) -> Result<Self, RegistryError> {
        if params.expires_at <= params.connected_at {
            return Err(RegistryError::Validation(format!(
                "connection {} would expire before it connects",
                params.connection_id
            )));
        }
        Ok(Self {
            connection_id: params.connection_id,
            tenant_id: params.tenant_id,
            user_id: params.user_id,
            role: params.role,
            connected_at: params.connected_at,
            expires_at: params.expires_at,
        })
    }

    fn id(&self) -> ConnectionId {
        self.connection_id.clone()
    }

    fn version(&self) {}

    /// Reachable by role pool and by user, both within the tenant.
    fn index_keys(&self) -> Vec<RoutingKey> {
        vec![
            RoutingKey::role(self.tenant_id.clone(), self.role),
            RoutingKey::user(self.tenant_id.clone(), self.user_id.clone()),
        ]
    }

    fn on_update(&mut self, _update: ()) -> Result<(), RegistryError> {
        Ok(())
    }
}
