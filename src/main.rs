//! # Order Relay Demo
//!
//! Walks one order through its whole lifecycle over an in-process transport:
//! 1.  Starts the [`OrderSystem`].
//! 2.  Connects a dispatcher, a cook and the customer.
//! 3.  Creates an order and drives it to `DELIVERED`, logging every delivery report.

use actor_framework::tracing::setup_tracing;
use order_relay::config::Config;
use order_relay::engine::OrderIntake;
use order_relay::gateway::ConnectEvent;
use order_relay::lifecycle::OrderSystem;
use order_relay::model::{ConnectionId, OrderStatus, TenantId, UserId};
use order_relay::router::ChannelTransport;
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::from_env()?;
    info!("Starting order relay demo");

    let transport = Arc::new(ChannelTransport::new());
    let system = OrderSystem::new(config, transport.clone());

    // Connect one client per role and print what each one receives
    let tenant = "tenant-1";
    let mut listeners = Vec::new();
    for (connection, user, role) in [
        ("conn-dispatch", "dispatcher-1", Some("DISPATCHER")),
        ("conn-cook", "cook-1", Some("cook")),
        ("conn-customer", "customer-1", None),
    ] {
        let connection_id = ConnectionId::from(connection);
        let mut inbox = transport.attach(connection_id.clone());
        listeners.push(tokio::spawn(
            async move {
                while let Some(notification) = inbox.recv().await {
                    info!(payload = %notification.to_json(), "Received");
                }
            }
            .instrument(tracing::info_span!("client", connection)),
        ));

        let response = system
            .gateway
            .on_connect(ConnectEvent {
                connection_id,
                tenant_id: Some(tenant.to_string()),
                user_id: Some(user.to_string()),
                role: role.map(str::to_string),
            })
            .await;
        info!(status = %response.status, body = %response.body, "Connect answered");
    }

    let intake: OrderIntake = serde_json::from_value(serde_json::json!({
        "tenantId": tenant,
        "userId": "customer-1",
        "userInfo": { "name": "Ana" },
        "items": [{ "sku": "pad-thai", "quantity": 2 }],
        "total": "42.50",
        "requestId": "demo-1"
    }))?;

    let span = tracing::info_span!("order_lifecycle");
    async {
        let created = system.engine.create_order(intake).await?;
        let order_id = created.order.order_id;
        info!(
            %order_id,
            request_id = ?created.request_id,
            delivered = created.delivery.delivered.len(),
            "Order created"
        );

        let tenant_id = TenantId::from(tenant);
        for (target, actor) in [
            (OrderStatus::Assigned, "cook-1"),
            (OrderStatus::Preparing, "cook-1"),
            (OrderStatus::Ready, "cook-1"),
            (OrderStatus::Dispatched, "dispatcher-1"),
            (OrderStatus::Delivered, "dispatcher-1"),
        ] {
            let outcome = system
                .engine
                .transition_order(&tenant_id, order_id, target, Some(UserId::from(actor)))
                .await?;
            info!(
                status = %outcome.order.status,
                delivered = outcome.delivery.delivered.len(),
                failed = outcome.delivery.failed.len(),
                "Transition applied"
            );
        }

        let order = system.engine.get_order(&tenant_id, order_id).await?;
        info!(order = %serde_json::to_value(&order)?, "Final order");
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    system
        .gateway
        .on_disconnect(&ConnectionId::from("conn-customer"))
        .await;

    // Shutdown system gracefully
    system.shutdown().await?;

    // Closing the transport ends every client stream
    drop(transport);
    for listener in listeners {
        listener.await?;
    }

    info!("Demo completed successfully");
    Ok(())
}
