use actor_framework::ActorClient;
use async_trait::async_trait;
use order_relay::config::Config;
use order_relay::engine::OrderIntake;
use order_relay::gateway::ConnectEvent;
use order_relay::lifecycle::OrderSystem;
use order_relay::model::{
    ConnectionId, Notification, NotificationKind, OrderStatus, TenantId, UserId,
};
use order_relay::order_actor::OrderError;
use order_relay::router::{ChannelTransport, Transport, TransportError};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn intake(tenant: &str, user: &str) -> OrderIntake {
    serde_json::from_value(json!({
        "tenantId": tenant,
        "userId": user,
        "items": [{"sku": "pad-thai", "qty": 1}],
        "total": "42.5",
        "requestId": "req-1"
    }))
    .unwrap()
}

async fn connect(
    system: &OrderSystem,
    transport: &ChannelTransport,
    connection: &str,
    tenant: &str,
    user: &str,
    role: Option<&str>,
) -> mpsc::Receiver<Notification> {
    let inbox = transport.attach(connection.into());
    let response = system
        .gateway
        .on_connect(ConnectEvent {
            connection_id: connection.into(),
            tenant_id: Some(tenant.into()),
            user_id: Some(user.into()),
            role: role.map(str::to_string),
        })
        .await;
    assert_eq!(response.status, http::StatusCode::OK);
    inbox
}

fn drain(inbox: &mut mpsc::Receiver<Notification>) -> Vec<Notification> {
    let mut received = Vec::new();
    while let Ok(notification) = inbox.try_recv() {
        received.push(notification);
    }
    received
}

fn kinds(inbox: &mut mpsc::Receiver<Notification>) -> Vec<NotificationKind> {
    drain(inbox).into_iter().map(|n| n.kind).collect()
}

#[tokio::test]
async fn test_create_then_assign() {
    let system = OrderSystem::new(Config::default(), Arc::new(ChannelTransport::new()));
    let t1 = TenantId::from("t1");

    let created = system.engine.create_order(intake("t1", "u1")).await.unwrap();
    let order = &created.order;
    assert_eq!(created.request_id.as_deref(), Some("req-1"));
    assert_eq!(order.status, OrderStatus::Created);
    assert_eq!(order.total, Decimal::new(425, 1));
    assert_eq!(order.created_at, order.updated_at);
    assert_eq!(order.timeline.statuses(), vec![OrderStatus::Created]);
    assert_eq!(order.timeline.get(OrderStatus::Created), Some(order.created_at));
    assert!(order.cook_id.is_none() && order.dispatcher_id.is_none() && order.resolved_at.is_none());
    assert_eq!(order.payment_method, "CASH");
    assert_eq!(order.estimated_preparation_time, 15);

    let outcome = system
        .engine
        .transition_order(&t1, order.order_id, OrderStatus::Assigned, Some("cook1".into()))
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.order.status, OrderStatus::Assigned);
    assert_eq!(outcome.order.cook_id, Some(UserId::from("cook1")));
    assert_eq!(
        outcome.order.timeline.statuses(),
        vec![OrderStatus::Created, OrderStatus::Assigned]
    );

    // Read-after-write
    let stored = system.engine.get_order(&t1, order.order_id).await.unwrap();
    assert_eq!(stored, outcome.order);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_full_lifecycle_notifies_the_right_people() {
    let transport = Arc::new(ChannelTransport::new());
    let system = OrderSystem::new(Config::default(), transport.clone());

    let mut dispatch = connect(&system, &transport, "c-d1", "t1", "d1", Some("DISPATCHER")).await;
    let mut cook = connect(&system, &transport, "c-cook1", "t1", "cook1", Some("cook")).await;
    let mut customer = connect(&system, &transport, "c-u1", "t1", "u1", None).await;
    let mut stranger = connect(&system, &transport, "c-x", "t2", "d9", Some("DISPATCHER")).await;

    let t1 = TenantId::from("t1");
    let created = system.engine.create_order(intake("t1", "u1")).await.unwrap();
    let order_id = created.order.order_id;
    assert_eq!(created.delivery.delivered, vec![ConnectionId::from("c-d1")]);
    assert_eq!(kinds(&mut dispatch), vec![NotificationKind::OrderCreated]);
    assert!(drain(&mut customer).is_empty());

    let steps = [
        (OrderStatus::Assigned, "cook1"),
        (OrderStatus::Preparing, "cook1"),
        (OrderStatus::Ready, "cook1"),
        (OrderStatus::Dispatched, "d1"),
        (OrderStatus::Delivered, "d1"),
    ];
    for (target, actor) in steps {
        let outcome = system
            .engine
            .transition_order(&t1, order_id, target, Some(actor.into()))
            .await
            .unwrap();
        assert!(outcome.delivery.is_clean());
    }

    assert_eq!(
        kinds(&mut customer),
        vec![
            NotificationKind::OrderStatusUpdate,
            NotificationKind::OrderStatusUpdate,
            NotificationKind::OrderReady,
            NotificationKind::DriverAssigned,
            NotificationKind::OrderDelivered,
        ]
    );
    assert_eq!(kinds(&mut cook).len(), 5);
    // READY reaches the pool; DISPATCHED and DELIVERED reach the assigned dispatcher
    assert_eq!(
        kinds(&mut dispatch),
        vec![
            NotificationKind::OrderReady,
            NotificationKind::DriverAssigned,
            NotificationKind::OrderDelivered,
        ]
    );
    assert!(drain(&mut stranger).is_empty());

    let order = system.engine.get_order(&t1, order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.dispatcher_id, Some(UserId::from("d1")));
    assert_eq!(order.resolved_at, Some(order.updated_at));
    assert_eq!(
        order.timeline.statuses(),
        vec![
            OrderStatus::Created,
            OrderStatus::Assigned,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Dispatched,
            OrderStatus::Delivered,
        ]
    );
    let stamps: Vec<_> = order.timeline.entries().iter().map(|e| e.at).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_notification_payload_content() {
    let transport = Arc::new(ChannelTransport::new());
    let system = OrderSystem::new(Config::default(), transport.clone());
    let mut customer = connect(&system, &transport, "c-u1", "t1", "u1", Some("USER")).await;

    let created = system.engine.create_order(intake("t1", "u1")).await.unwrap();
    let outcome = system
        .engine
        .transition_order(
            &"t1".into(),
            created.order.order_id,
            OrderStatus::Assigned,
            Some("cook1".into()),
        )
        .await
        .unwrap();

    let received = drain(&mut customer);
    assert_eq!(received.len(), 1);
    let data = &received[0].data;
    assert_eq!(data.order_id, created.order.order_id);
    assert_eq!(data.previous_status, Some(OrderStatus::Created));
    assert_eq!(data.new_status, OrderStatus::Assigned);
    assert_eq!(data.updated_by, Some(UserId::from("cook1")));
    assert_eq!(data.timestamp, outcome.order.updated_at);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cross_tenant_access_is_not_found() {
    let system = OrderSystem::new(Config::default(), Arc::new(ChannelTransport::new()));
    let created = system.engine.create_order(intake("t1", "u1")).await.unwrap();
    let order_id = created.order.order_id;
    let t2 = TenantId::from("t2");

    let read = system.engine.get_order(&t2, order_id).await;
    assert!(matches!(read, Err(OrderError::NotFound(_))));

    let write = system
        .engine
        .transition_order(&t2, order_id, OrderStatus::Cancelled, None)
        .await;
    assert!(matches!(write, Err(OrderError::NotFound(_))));

    let stored = system.engine.get_order(&"t1".into(), order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Created);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_transition_leaves_order_unchanged() {
    let system = OrderSystem::new(Config::default(), Arc::new(ChannelTransport::new()));
    let t1 = TenantId::from("t1");
    let order_id = system
        .engine
        .create_order(intake("t1", "u1"))
        .await
        .unwrap()
        .order
        .order_id;
    system
        .engine
        .transition_order(&t1, order_id, OrderStatus::Cancelled, Some("u1".into()))
        .await
        .unwrap();
    let before = system.engine.get_order(&t1, order_id).await.unwrap();

    for target in [OrderStatus::Created, OrderStatus::Assigned, OrderStatus::Delivered] {
        let result = system
            .engine
            .transition_order(&t1, order_id, target, Some("cook1".into()))
            .await;
        assert_eq!(
            result.unwrap_err(),
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: target
            }
        );
    }

    let skip = system
        .engine
        .create_order(intake("t1", "u1"))
        .await
        .unwrap()
        .order
        .order_id;
    let result = system
        .engine
        .transition_order(&t1, skip, OrderStatus::Ready, None)
        .await;
    assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));

    assert_eq!(system.engine.get_order(&t1, order_id).await.unwrap(), before);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_duplicate_transition_is_idempotent() {
    let transport = Arc::new(ChannelTransport::new());
    let system = OrderSystem::new(Config::default(), transport.clone());
    let mut customer = connect(&system, &transport, "c-u1", "t1", "u1", None).await;
    let t1 = TenantId::from("t1");

    let order_id = system
        .engine
        .create_order(intake("t1", "u1"))
        .await
        .unwrap()
        .order
        .order_id;
    let first = system
        .engine
        .transition_order(&t1, order_id, OrderStatus::Assigned, Some("cook1".into()))
        .await
        .unwrap();
    let second = system
        .engine
        .transition_order(&t1, order_id, OrderStatus::Assigned, Some("cook1".into()))
        .await
        .unwrap();

    assert!(first.changed);
    assert!(!second.changed);
    assert!(second.delivery.is_empty());
    assert_eq!(second.order, first.order);
    assert_eq!(
        second.order.timeline.get(OrderStatus::Assigned),
        first.order.timeline.get(OrderStatus::Assigned)
    );
    // One notification batch, not two
    assert_eq!(drain(&mut customer).len(), 1);

    // Same status, different cook: not a duplicate
    let other = system
        .engine
        .transition_order(&t1, order_id, OrderStatus::Assigned, Some("cook2".into()))
        .await;
    assert!(matches!(other, Err(OrderError::InvalidTransition { .. })));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_assignment_requires_actor() {
    let system = OrderSystem::new(Config::default(), Arc::new(ChannelTransport::new()));
    let order_id = system
        .engine
        .create_order(intake("t1", "u1"))
        .await
        .unwrap()
        .order
        .order_id;

    let result = system
        .engine
        .transition_order(&"t1".into(), order_id, OrderStatus::Assigned, None)
        .await;
    assert!(matches!(result, Err(OrderError::Validation(_))));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_illegal_edge_without_actor_is_invalid_transition() {
    let system = OrderSystem::new(Config::default(), Arc::new(ChannelTransport::new()));
    let t1 = TenantId::from("t1");
    let order_id = system
        .engine
        .create_order(intake("t1", "u1"))
        .await
        .unwrap()
        .order
        .order_id;
    system
        .engine
        .transition_order(&t1, order_id, OrderStatus::Cancelled, None)
        .await
        .unwrap();

    for target in [OrderStatus::Dispatched, OrderStatus::Assigned] {
        let result = system
            .engine
            .transition_order(&t1, order_id, target, None)
            .await;
        assert_eq!(
            result.unwrap_err(),
            OrderError::InvalidTransition {
                from: OrderStatus::Cancelled,
                to: target
            }
        );
    }

    // Skipping ahead is rejected on the graph before the missing actor matters
    let fresh = system
        .engine
        .create_order(intake("t1", "u1"))
        .await
        .unwrap()
        .order
        .order_id;
    let result = system
        .engine
        .transition_order(&t1, fresh, OrderStatus::Dispatched, None)
        .await;
    assert!(matches!(result, Err(OrderError::InvalidTransition { .. })));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_intake_validation() {
    let system = OrderSystem::new(Config::default(), Arc::new(ChannelTransport::new()));

    let result = system
        .engine
        .create_order(OrderIntake {
            items: Some(vec![]),
            ..intake("t1", "u1")
        })
        .await;
    assert!(matches!(result, Err(OrderError::Validation(_))));

    let result = system
        .engine
        .create_order(OrderIntake {
            user_id: None,
            ..intake("t1", "u1")
        })
        .await;
    assert_eq!(
        result.unwrap_err().status_code(),
        http::StatusCode::BAD_REQUEST
    );

    assert!(system
        .engine
        .list_orders(&"t1".into(), None)
        .await
        .unwrap()
        .is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_configured_intake_defaults() {
    let config = Config {
        default_payment_method: "CARD".into(),
        default_preparation_minutes: 30,
        ..Config::default()
    };
    let system = OrderSystem::new(config, Arc::new(ChannelTransport::new()));

    let created = system.engine.create_order(intake("t1", "u1")).await.unwrap();
    assert_eq!(created.order.payment_method, "CARD");
    assert_eq!(created.order.estimated_preparation_time, 30);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_list_orders_newest_first_with_filter() {
    let system = OrderSystem::new(Config::default(), Arc::new(ChannelTransport::new()));
    let t1 = TenantId::from("t1");

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            system
                .engine
                .create_order(intake("t1", "u1"))
                .await
                .unwrap()
                .order
                .order_id,
        );
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    system.engine.create_order(intake("t2", "u9")).await.unwrap();
    system
        .engine
        .transition_order(&t1, ids[1], OrderStatus::Cancelled, None)
        .await
        .unwrap();

    let all: Vec<_> = system
        .engine
        .list_orders(&t1, None)
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.order_id)
        .collect();
    assert_eq!(all, vec![ids[2], ids[1], ids[0]]);

    let cancelled = system
        .engine
        .list_orders(&t1, Some(OrderStatus::Cancelled))
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].order_id, ids[1]);

    system.shutdown().await.unwrap();
}

/// Transport where every peer is unreachable.
struct DeadTransport;

#[async_trait]
impl Transport for DeadTransport {
    async fn send(
        &self,
        connection_id: &ConnectionId,
        _notification: &Notification,
    ) -> Result<(), TransportError> {
        Err(TransportError::Gone(connection_id.clone()))
    }
}

#[tokio::test]
async fn test_transition_succeeds_when_every_send_fails() {
    let system = OrderSystem::new(Config::default(), Arc::new(DeadTransport));
    for (connection, user, role) in [("c1", "d1", "DISPATCHER"), ("c2", "u1", "USER")] {
        system
            .registry
            .register(connection.into(), "t1".into(), user.into(), role.parse().unwrap())
            .await
            .unwrap();
    }

    let created = system.engine.create_order(intake("t1", "u1")).await.unwrap();
    assert_eq!(created.delivery.failed.len(), 1);
    assert!(created.delivery.delivered.is_empty());

    let outcome = system
        .engine
        .transition_order(
            &"t1".into(),
            created.order.order_id,
            OrderStatus::Cancelled,
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome.order.status, OrderStatus::Cancelled);
    assert_eq!(outcome.delivery.failed.len(), 1);
    assert_eq!(
        outcome.delivery.failed[0].error,
        TransportError::Gone("c2".into())
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sweeper_reclaims_expired_connections() {
    let config = Config {
        connection_ttl: Duration::from_millis(40),
        sweep_interval: Some(Duration::from_millis(20)),
        ..Config::default()
    };
    let system = OrderSystem::new(config, Arc::new(ChannelTransport::new()));
    let connection_id = ConnectionId::from("c1");
    system
        .registry
        .register(connection_id.clone(), "t1".into(), "u1".into(), Default::default())
        .await
        .unwrap();
    assert!(system.registry.get(connection_id.clone()).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(system.registry.get(connection_id).await.unwrap().is_none());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_disconnect_stops_delivery() {
    let transport = Arc::new(ChannelTransport::new());
    let system = OrderSystem::new(Config::default(), transport.clone());
    let mut dispatch = connect(&system, &transport, "c-d1", "t1", "d1", Some("DISPATCHER")).await;

    let response = system.gateway.on_disconnect(&"c-d1".into()).await;
    assert_eq!(response.status, http::StatusCode::OK);

    let created = system.engine.create_order(intake("t1", "u1")).await.unwrap();
    assert!(created.delivery.is_empty());
    assert!(drain(&mut dispatch).is_empty());

    system.shutdown().await.unwrap();
}
