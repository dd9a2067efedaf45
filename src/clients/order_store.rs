//! # Order Store
//!
//! Provides a high‑level API for interacting with the `Order` actor.
//! It wraps a `ResourceClient<Order>` and turns framework failures into the
//! [`OrderError`] taxonomy.
use crate::model::{Order, OrderCreate, OrderId, OrderKey, OrderStatus, OrderTransition, TenantId};
use crate::order_actor::OrderError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for the Order actor.
///
/// Every read and write is addressed by `(tenant, order id)`; an order of another
/// tenant is indistinguishable from a missing one.
#[derive(Clone)]
pub struct OrderStore {
    inner: ResourceClient<Order>,
}

impl OrderStore {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    /// Persists a new order.
    #[instrument(skip(self, params), fields(tenant_id = %params.tenant_id, order_id = %params.order_id))]
    pub async fn insert(&self, params: OrderCreate) -> Result<Order, OrderError> {
        debug!(?params, "insert called");
        self.inner
            .create(params)
            .await
            .map_err(|e| OrderError::Persistence(e.to_string()))
    }

    /// Tenant-scoped point read.
    #[instrument(skip(self))]
    pub async fn fetch(
        &self,
        tenant_id: &TenantId,
        order_id: OrderId,
    ) -> Result<Option<Order>, OrderError> {
        let key = OrderKey::new(tenant_id.clone(), order_id);
        self.inner.get(key).await.map_err(Self::map_error)
    }

    /// Applies `transition` only if the stored status is still `expected`.
    ///
    /// A lost race surfaces as [`OrderError::ConcurrentModification`].
    #[instrument(skip(self))]
    pub async fn apply_transition(
        &self,
        key: OrderKey,
        expected: OrderStatus,
        transition: OrderTransition,
    ) -> Result<Order, OrderError> {
        let order_id = key.order_id;
        self.inner
            .update(key, Some(expected), transition)
            .await
            .map_err(|e| match e {
                FrameworkError::NotFound(_) => OrderError::NotFound(order_id.to_string()),
                FrameworkError::VersionConflict { .. } => {
                    OrderError::ConcurrentModification(order_id.to_string())
                }
                FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                    Ok(order_error) => *order_error,
                    Err(other) => OrderError::Persistence(other.to_string()),
                },
                other => OrderError::Persistence(other.to_string()),
            })
    }

    /// All orders of a tenant, in no particular order.
    #[instrument(skip(self))]
    pub async fn list_by_tenant(&self, tenant_id: &TenantId) -> Result<Vec<Order>, OrderError> {
        self.inner
            .lookup(tenant_id.clone())
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Order> for OrderStore {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::Persistence(e.to_string())
    }
}
