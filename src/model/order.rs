//! Customer orders and their lifecycle.
//!
//! # Actor Framework
//! [`Order`] implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
//! allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
//!
//! See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
//! - Creation parameters ([`OrderCreate`])
//! - Update parameters ([`OrderTransition`])
//! - The version token used for conditional writes ([`OrderStatus`])

use crate::model::{OrderId, TenantId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

/// Lifecycle status of an order.
///
/// `CREATED → ASSIGNED → PREPARING → READY → DISPATCHED → DELIVERED`, with
/// `CANCELLED` reachable from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Assigned,
    Preparing,
    Ready,
    Dispatched,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        Self::Created,
        Self::Assigned,
        Self::Preparing,
        Self::Ready,
        Self::Dispatched,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Returns true if no further transition is legal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Assigned => "ASSIGNED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Dispatched => "DISPATCHED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// One timeline entry: when the order first entered `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
}

/// Status → first-entry timestamp, kept in the order statuses were entered.
///
/// Append-only: an entry, once recorded, is never overwritten.
/// Serializes as a JSON object (`{"CREATED": "...", "ASSIGNED": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline(Vec<TimelineEntry>);

impl Timeline {
    pub fn starting(status: OrderStatus, at: DateTime<Utc>) -> Self {
        Self(vec![TimelineEntry { status, at }])
    }

    pub fn get(&self, status: OrderStatus) -> Option<DateTime<Utc>> {
        self.0.iter().find(|e| e.status == status).map(|e| e.at)
    }

    /// Records `status` at `at` unless it is already present. Returns whether it was added.
    pub fn record(&mut self, status: OrderStatus, at: DateTime<Utc>) -> bool {
        if self.get(status).is_some() {
            return false;
        }
        self.0.push(TimelineEntry { status, at });
        true
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.0
    }

    pub fn statuses(&self) -> Vec<OrderStatus> {
        self.0.iter().map(|e| e.status).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Timeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|e| (e.status, e.at)))
    }
}

/// Primary key of an order: orders are only ever addressed within their tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub tenant_id: TenantId,
    pub order_id: OrderId,
}

impl OrderKey {
    pub fn new(tenant_id: TenantId, order_id: OrderId) -> Self {
        Self {
            tenant_id,
            order_id,
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant_id, self.order_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    /// Profile snapshot taken at order time. Never refreshed.
    pub user_info: serde_json::Value,
    pub status: OrderStatus,
    pub items: Vec<serde_json::Value>,
    pub notes: String,
    pub payment_method: String,
    pub total: Decimal,
    /// Minutes.
    pub estimated_preparation_time: u32,
    pub timeline: Timeline,
    pub cook_id: Option<UserId>,
    pub dispatcher_id: Option<UserId>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn key(&self) -> OrderKey {
        OrderKey::new(self.tenant_id.clone(), self.order_id)
    }
}

/// Payload for storing a freshly accepted order.
///
/// Built by the lifecycle engine after intake validation; defaults are already applied.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub order_id: OrderId,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub user_info: serde_json::Value,
    pub items: Vec<serde_json::Value>,
    pub notes: String,
    pub payment_method: String,
    pub total: Decimal,
    pub estimated_preparation_time: u32,
    pub created_at: DateTime<Utc>,
}

/// Payload for moving an order to a new status.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTransition {
    pub status: OrderStatus,
    pub at: DateTime<Utc>,
    /// Set when entering `ASSIGNED`.
    pub cook_id: Option<UserId>,
    /// Set when entering `DISPATCHED`.
    pub dispatcher_id: Option<UserId>,
}
