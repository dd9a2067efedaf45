//! Entity trait implementation for the Order domain type.
//!
//! This module contains the [`ActorEntity`] trait implementation
//! that enables [`Order`] to be managed by the generic [`actor_framework::ResourceActor`].
//!
//! See the trait implementation on [`Order`] for method documentation.

use crate::model::{Order, OrderCreate, OrderKey, OrderStatus, OrderTransition, TenantId, Timeline};
use crate::order_actor::{OrderError, OrderStateMachine};
use actor_framework::ActorEntity;

impl ActorEntity for Order {
    type Id = OrderKey;
    type Create = OrderCreate;
    type Update = OrderTransition;
    /// The current status. Every legal move goes to a later status, so a status
    /// token never comes back once superseded.
    type Version = OrderStatus;
    type IndexKey = TenantId;
    type Error = OrderError;

    /// Builds the order in `CREATED`, with one timeline entry and all timestamps equal.
    fn from_create_params(params: OrderCreate) -> Result<Self, OrderError> {
        let created_at = params.created_at;
        Ok(Self {
            order_id: params.order_id,
            tenant_id: params.tenant_id,
            user_id: params.user_id,
            user_info: params.user_info,
            status: OrderStatus::Created,
            items: params.items,
            notes: params.notes,
            payment_method: params.payment_method,
            total: params.total,
            estimated_preparation_time: params.estimated_preparation_time,
            timeline: Timeline::starting(OrderStatus::Created, created_at),
            cook_id: None,
            dispatcher_id: None,
            resolved_at: None,
            created_at,
            updated_at: created_at,
        })
    }

    fn id(&self) -> OrderKey {
        self.key()
    }

    fn version(&self) -> OrderStatus {
        self.status
    }

    fn index_keys(&self) -> Vec<TenantId> {
        vec![self.tenant_id.clone()]
    }

    /// Applies a transition.
    ///
    /// The graph is re-checked here so the store itself never holds an order that
    /// skipped a status. The timestamp is clamped to `updated_at` so the timeline
    /// stays non-decreasing if the wall clock steps back.
    fn on_update(&mut self, transition: OrderTransition) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, transition.status)?;

        let at = transition.at.max(self.updated_at);
        self.status = transition.status;
        self.updated_at = at;
        self.timeline.record(transition.status, at);

        match transition.status {
            OrderStatus::Assigned => self.cook_id = transition.cook_id,
            OrderStatus::Dispatched => self.dispatcher_id = transition.dispatcher_id,
            _ => {}
        }
        if transition.status.is_terminal() {
            self.resolved_at = Some(at);
        }
        Ok(())
    }
}
