//! Transition → notification table.
//!
//! Who hears about an order entering a status, and with which payload kind, is static
//! data. Supporting a new status means adding a row here, not a branch elsewhere.

use crate::model::{NotificationKind, Order, OrderStatus, Role, RoutingKey};

/// A group of recipients, resolved against a concrete order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Every connection of the tenant with this role.
    RolePool(Role),
    /// The customer who placed the order.
    OrderingUser,
    /// The assigned cook, if any yet.
    AssignedCook,
    /// The assigned dispatcher, if any yet.
    AssignedDispatcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub status: OrderStatus,
    pub kind: NotificationKind,
    pub message: &'static str,
    pub audiences: &'static [Audience],
}

use Audience::*;

pub const ROUTES: [Route; 7] = [
    Route {
        status: OrderStatus::Created,
        kind: NotificationKind::OrderCreated,
        message: "New order received",
        audiences: &[RolePool(Role::Dispatcher)],
    },
    Route {
        status: OrderStatus::Assigned,
        kind: NotificationKind::OrderStatusUpdate,
        message: "Order assigned to a cook",
        audiences: &[AssignedCook, OrderingUser],
    },
    Route {
        status: OrderStatus::Preparing,
        kind: NotificationKind::OrderStatusUpdate,
        message: "Order is being prepared",
        audiences: &[OrderingUser, AssignedCook],
    },
    Route {
        status: OrderStatus::Ready,
        kind: NotificationKind::OrderReady,
        message: "Order is ready for pickup",
        audiences: &[OrderingUser, AssignedCook, RolePool(Role::Dispatcher)],
    },
    Route {
        status: OrderStatus::Dispatched,
        kind: NotificationKind::DriverAssigned,
        message: "Order is on its way",
        audiences: &[OrderingUser, AssignedCook, AssignedDispatcher],
    },
    Route {
        status: OrderStatus::Delivered,
        kind: NotificationKind::OrderDelivered,
        message: "Order delivered",
        audiences: &[OrderingUser, AssignedCook, AssignedDispatcher],
    },
    Route {
        status: OrderStatus::Cancelled,
        kind: NotificationKind::OrderCancelled,
        message: "Order cancelled",
        audiences: &[OrderingUser, AssignedCook, AssignedDispatcher],
    },
];

/// The row for `status`.
pub fn route_for(status: OrderStatus) -> &'static Route {
    // ROUTES has one row per status, in declaration order.
    &ROUTES[status as usize]
}

impl Audience {
    /// The routing key this audience maps to for `order`, or `None` while unassigned.
    pub fn resolve(&self, order: &Order) -> Option<RoutingKey> {
        let tenant_id = order.tenant_id.clone();
        match self {
            RolePool(role) => Some(RoutingKey::role(tenant_id, *role)),
            OrderingUser => Some(RoutingKey::user(tenant_id, order.user_id.clone())),
            AssignedCook => order
                .cook_id
                .clone()
                .map(|cook| RoutingKey::user(tenant_id, cook)),
            AssignedDispatcher => order
                .dispatcher_id
                .clone()
                .map(|dispatcher| RoutingKey::user(tenant_id, dispatcher)),
        }
    }
}

/// Routing keys to notify now that `order` is in its current status.
pub fn routing_keys(order: &Order) -> Vec<RoutingKey> {
    let mut keys: Vec<RoutingKey> = Vec::new();
    for key in route_for(order.status)
        .audiences
        .iter()
        .filter_map(|audience| audience.resolve(order))
    {
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
