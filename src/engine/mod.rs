//! # Order Lifecycle Engine
//!
//! Creates orders, moves them through the lifecycle graph and tells the right people.
//!
//! ```text
//! intake ──► validate ──► OrderStore::insert ──► NotificationRouter (dispatcher pool)
//!
//! transition ──► fetch (tenant-scoped) ──► OrderStateMachine
//!            ──► OrderStore::apply_transition (expected = prior status)
//!            ──► routing table ──► NotificationRouter
//! ```
//!
//! A successful write is never undone by a failed notification: delivery problems end
//! up in the returned [`DeliveryReport`], not in the `Err` branch.

pub mod intake;
pub mod routing;

pub use intake::*;

use crate::clients::OrderStore;
use crate::model::{
    Notification, NotificationData, Order, OrderCreate, OrderId, OrderStatus, OrderTransition,
    TenantId, UserId,
};
use crate::order_actor::{OrderError, OrderStateMachine};
use crate::router::{DeliveryReport, NotificationRouter};
use chrono::Utc;
use tracing::{info, instrument, warn};

/// Result of a transition request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub order: Order,
    /// False when the request repeated a transition that had already been applied.
    pub changed: bool,
    pub delivery: DeliveryReport,
}

#[derive(Clone)]
pub struct OrderLifecycleEngine {
    store: OrderStore,
    router: NotificationRouter,
    defaults: IntakeDefaults,
}

impl OrderLifecycleEngine {
    pub fn new(store: OrderStore, router: NotificationRouter, defaults: IntakeDefaults) -> Self {
        Self {
            store,
            router,
            defaults,
        }
    }

    /// Validates and persists a new order, then notifies the tenant's dispatchers.
    ///
    /// # Errors
    ///
    /// [`OrderError::Validation`] for a bad intake record, [`OrderError::Persistence`]
    /// if the store write fails. Neither is retried here.
    #[instrument(skip(self, intake), fields(request_id = ?intake.request_id))]
    pub async fn create_order(&self, intake: OrderIntake) -> Result<CreatedOrder, OrderError> {
        let intake = intake.validate(&self.defaults).inspect_err(|e| {
            warn!(error = %e, "Order intake rejected");
        })?;

        let order = self
            .store
            .insert(OrderCreate {
                order_id: OrderId::generate(),
                tenant_id: intake.tenant_id,
                user_id: intake.user_id,
                user_info: intake.user_info,
                items: intake.items,
                notes: intake.notes,
                payment_method: intake.payment_method,
                total: intake.total,
                estimated_preparation_time: intake.estimated_preparation_time,
                created_at: Utc::now(),
            })
            .await?;
        info!(order_id = %order.order_id, tenant_id = %order.tenant_id, "Order created");

        let delivery = self.notify(&order, None, None).await;
        Ok(CreatedOrder {
            order,
            request_id: intake.request_id,
            delivery,
        })
    }

    /// Moves an order to `target`.
    ///
    /// `actor_id` names the cook when entering `ASSIGNED` and the dispatcher when entering
    /// `DISPATCHED`; it is required there and recorded as `updatedBy` everywhere.
    ///
    /// Repeating a transition that already happened (same status, same assignee) returns
    /// the stored order with `changed == false` and sends nothing.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotFound`] for an unknown id or an order of another tenant
    /// - [`OrderError::InvalidTransition`] when the graph has no such edge
    /// - [`OrderError::Validation`] when a legal edge into `ASSIGNED` or `DISPATCHED`
    ///   names no actor
    /// - [`OrderError::ConcurrentModification`] when another writer got there first
    /// - [`OrderError::Persistence`] when the store fails
    #[instrument(skip(self))]
    pub async fn transition_order(
        &self,
        tenant_id: &TenantId,
        order_id: OrderId,
        target: OrderStatus,
        actor_id: Option<UserId>,
    ) -> Result<TransitionOutcome, OrderError> {
        let current = self.get_order(tenant_id, order_id).await?;

        if current.status == target {
            let assigned = match target {
                OrderStatus::Assigned => current.cook_id.as_ref(),
                OrderStatus::Dispatched => current.dispatcher_id.as_ref(),
                _ => None,
            };
            let requested = match target {
                OrderStatus::Assigned | OrderStatus::Dispatched => actor_id.as_ref(),
                _ => None,
            };
            if assigned == requested {
                info!(status = %target, "Duplicate transition ignored");
                return Ok(TransitionOutcome {
                    order: current,
                    changed: false,
                    delivery: DeliveryReport::default(),
                });
            }
        }

        OrderStateMachine::validate_transition(current.status, target).inspect_err(|e| {
            warn!(error = %e, "Transition rejected");
        })?;

        let assignee = match target {
            OrderStatus::Assigned | OrderStatus::Dispatched => Some(actor_id.clone().ok_or_else(
                || OrderError::Validation(format!("actorId is required to enter {target}")),
            )?),
            _ => None,
        };

        let previous = current.status;
        let order = self
            .store
            .apply_transition(
                current.key(),
                previous,
                OrderTransition {
                    status: target,
                    at: Utc::now(),
                    cook_id: assignee.clone().filter(|_| target == OrderStatus::Assigned),
                    dispatcher_id: assignee.filter(|_| target == OrderStatus::Dispatched),
                },
            )
            .await
            .inspect_err(|e| warn!(error = %e, "Transition write failed"))?;
        info!(from = %previous, to = %target, "Order transitioned");

        let delivery = self.notify(&order, Some(previous), actor_id).await;
        Ok(TransitionOutcome {
            order,
            changed: true,
            delivery,
        })
    }

    /// Tenant-scoped read.
    pub async fn get_order(
        &self,
        tenant_id: &TenantId,
        order_id: OrderId,
    ) -> Result<Order, OrderError> {
        self.store
            .fetch(tenant_id, order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }

    /// Orders of a tenant, newest first, optionally only those in `status`.
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        tenant_id: &TenantId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderError> {
        let mut orders: Vec<Order> = self
            .store
            .list_by_tenant(tenant_id)
            .await?
            .into_iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn notify(
        &self,
        order: &Order,
        previous_status: Option<OrderStatus>,
        updated_by: Option<UserId>,
    ) -> DeliveryReport {
        let route = routing::route_for(order.status);
        let keys = routing::routing_keys(order);
        let notification = Notification {
            kind: route.kind,
            data: NotificationData {
                order_id: order.order_id,
                previous_status,
                new_status: order.status,
                timestamp: order.updated_at,
                message: route.message.to_string(),
                updated_by,
            },
        };
        self.router.dispatch(&keys, &notification).await
    }
}
