//! Live connections and the routing keys they are indexed under.
//!
//! [`Connection`] implements [`ActorEntity`](actor_framework::ActorEntity) in
//! `connection_actor::entity`; its index keys are the [`RoutingKey`]s notifications
//! are addressed to.

use crate::model::{ConnectionId, TenantId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// What a connected client is, for routing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// An ordering customer.
    #[default]
    User,
    Cook,
    Dispatcher,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Cook => "COOK",
            Self::Dispatcher => "DISPATCHER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "COOK" => Ok(Self::Cook),
            "DISPATCHER" => Ok(Self::Dispatcher),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A (tenant, role) or (tenant, user) pair selecting the connections a notification goes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutingKey {
    Role { tenant_id: TenantId, role: Role },
    User { tenant_id: TenantId, user_id: UserId },
}

impl RoutingKey {
    pub fn role(tenant_id: TenantId, role: Role) -> Self {
        Self::Role { tenant_id, role }
    }

    pub fn user(tenant_id: TenantId, user_id: UserId) -> Self {
        Self::User { tenant_id, user_id }
    }

    pub fn tenant_id(&self) -> &TenantId {
        match self {
            Self::Role { tenant_id, .. } | Self::User { tenant_id, .. } => tenant_id,
        }
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role { tenant_id, role } => write!(f, "{tenant_id}/role:{role}"),
            Self::User { tenant_id, user_id } => write!(f, "{tenant_id}/user:{user_id}"),
        }
    }
}

/// One live client session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: ConnectionId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub role: Role,
    pub connected_at: DateTime<Utc>,
    /// Past this instant the record is logically absent, stored or not.
    pub expires_at: DateTime<Utc>,
}

impl Connection {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Payload for registering a connection. Re-registering an id replaces the record.
#[derive(Debug, Clone)]
pub struct ConnectionCreate {
    pub connection_id: ConnectionId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub role: Role,
    pub connected_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
