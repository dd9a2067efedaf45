//! # Connection Gateway
//!
//! Adapter between the transport layer's connect/disconnect events and the
//! [`ConnectionRegistry`]. Answers are HTTP-shaped ([`GatewayResponse`]) so the
//! surrounding WebSocket layer can pass them through as-is.

use crate::clients::ConnectionRegistry;
use crate::connection_actor::RegistryError;
use crate::model::{ConnectionId, Role};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, instrument, warn};

/// A new session, as reported by the transport layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectEvent {
    pub connection_id: ConnectionId,
    pub tenant_id: Option<String>,
    pub user_id: Option<String>,
    /// Defaults to `USER`.
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl GatewayResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }
}

#[derive(Clone)]
pub struct ConnectionGateway {
    registry: ConnectionRegistry,
}

impl ConnectionGateway {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Registers the session.
    ///
    /// 400 when `userId` or `tenantId` is missing or the role is unknown,
    /// 500 when the registry fails, 200 with the connection id otherwise.
    #[instrument(skip(self))]
    pub async fn on_connect(&self, event: ConnectEvent) -> GatewayResponse {
        let (Some(tenant_id), Some(user_id)) = (
            event.tenant_id.filter(|t| !t.trim().is_empty()),
            event.user_id.filter(|u| !u.trim().is_empty()),
        ) else {
            warn!("Connect rejected: userId and tenantId are required");
            return GatewayResponse::error(
                StatusCode::BAD_REQUEST,
                "userId and tenantId are required",
            );
        };

        let role = match event.role.as_deref().map(str::parse::<Role>).transpose() {
            Ok(role) => role.unwrap_or_default(),
            Err(reason) => {
                warn!(%reason, "Connect rejected");
                return GatewayResponse::error(StatusCode::BAD_REQUEST, reason);
            }
        };

        match self
            .registry
            .register(
                event.connection_id,
                tenant_id.into(),
                user_id.into(),
                role,
            )
            .await
        {
            Ok(connection) => {
                info!(connection_id = %connection.connection_id, %role, "Connected");
                GatewayResponse::ok(json!({
                    "message": "Connected",
                    "connectionId": connection.connection_id,
                }))
            }
            Err(e @ RegistryError::Validation(_)) => {
                warn!(error = %e, "Connect rejected");
                GatewayResponse::error(e.status_code(), e.to_string())
            }
            Err(e @ RegistryError::Persistence(_)) => {
                error!(error = %e, "Failed to register connection");
                GatewayResponse::error(e.status_code(), "Failed to connect")
            }
        }
    }

    /// Forgets the session. Always acknowledged: an unknown id or a registry error only
    /// means the record will age out on its own.
    #[instrument(skip(self))]
    pub async fn on_disconnect(&self, connection_id: &ConnectionId) -> GatewayResponse {
        match self.registry.remove(connection_id).await {
            Ok(removed) => info!(removed, "Disconnected"),
            Err(e) => warn!(error = %e, "Disconnect cleanup failed, record will expire"),
        }
        GatewayResponse::ok(json!({ "message": "Disconnected" }))
    }
}
