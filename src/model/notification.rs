//! Payloads pushed to live clients.
//!
//! Wire shape:
//!
//! ```json
//! { "type": "ORDER_STATUS_UPDATE",
//!   "data": { "orderId": "...", "previousStatus": "CREATED", "newStatus": "ASSIGNED",
//!             "timestamp": "...", "message": "...", "updatedBy": "cook1" } }
//! ```

use crate::model::{OrderId, OrderStatus, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    OrderCreated,
    OrderStatusUpdate,
    OrderReady,
    DriverAssigned,
    OrderDelivered,
    OrderCancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub data: NotificationData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub order_id: OrderId,
    /// Unset for the creation notice.
    pub previous_status: Option<OrderStatus>,
    pub new_status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub updated_by: Option<UserId>,
}

impl Notification {
    pub fn to_json(&self) -> serde_json::Value {
        // Only string keys and plain values: serializing cannot fail.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_wire_shape() {
        let notification = Notification {
            kind: NotificationKind::DriverAssigned,
            data: NotificationData {
                order_id: OrderId(Uuid::nil()),
                previous_status: Some(OrderStatus::Ready),
                new_status: OrderStatus::Dispatched,
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
                message: "Order is on its way".into(),
                updated_by: Some("d1".into()),
            },
        };

        let json = notification.to_json();
        assert_eq!(json["type"], "DRIVER_ASSIGNED");
        assert_eq!(json["data"]["orderId"], Uuid::nil().to_string());
        assert_eq!(json["data"]["previousStatus"], "READY");
        assert_eq!(json["data"]["newStatus"], "DISPATCHED");
        assert_eq!(json["data"]["updatedBy"], "d1");
        assert_eq!(json["data"]["message"], "Order is on its way");
    }
}
