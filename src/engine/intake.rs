//! Order intake: the request record handed over by the upstream preparation step.
//!
//! Fields are optional on the wire. [`OrderIntake::validate`] enforces presence of the
//! required ones and fills defaults for the rest, so the engine only ever sees a
//! complete [`ValidIntake`].

use crate::model::{Order, TenantId, UserId};
use crate::order_actor::OrderError;
use crate::router::DeliveryReport;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIntake {
    pub tenant_id: Option<TenantId>,
    pub user_id: Option<UserId>,
    pub user_info: Option<serde_json::Value>,
    pub items: Option<Vec<serde_json::Value>>,
    pub notes: Option<String>,
    pub payment_method: Option<String>,
    pub total: Option<Decimal>,
    /// Minutes.
    pub estimated_preparation_time: Option<u32>,
    /// Correlation id, echoed back untouched.
    pub request_id: Option<String>,
}

/// Values used when the intake record leaves a field out.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeDefaults {
    pub payment_method: String,
    pub preparation_minutes: u32,
}

impl Default for IntakeDefaults {
    fn default() -> Self {
        Self {
            payment_method: "CASH".into(),
            preparation_minutes: 15,
        }
    }
}

/// An intake record that passed validation, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidIntake {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub user_info: serde_json::Value,
    pub items: Vec<serde_json::Value>,
    pub notes: String,
    pub payment_method: String,
    pub total: Decimal,
    pub estimated_preparation_time: u32,
    pub request_id: Option<String>,
}

/// A persisted order plus the echoed correlation id.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order: Order,
    pub request_id: Option<String>,
    /// Outcome of the creation notice. Informational only.
    #[serde(skip)]
    pub delivery: DeliveryReport,
}

impl OrderIntake {
    /// # Errors
    ///
    /// [`OrderError::Validation`] when `tenantId`, `userId`, `items` or `total` is
    /// missing, `items` is empty, or `total` is negative.
    pub fn validate(self, defaults: &IntakeDefaults) -> Result<ValidIntake, OrderError> {
        let tenant_id = self
            .tenant_id
            .filter(|t| !t.is_blank())
            .ok_or_else(|| missing("tenantId"))?;
        let user_id = self
            .user_id
            .filter(|u| !u.is_blank())
            .ok_or_else(|| missing("userId"))?;
        let items = self.items.ok_or_else(|| missing("items"))?;
        if items.is_empty() {
            return Err(OrderError::Validation("items must not be empty".into()));
        }
        let total = self.total.ok_or_else(|| missing("total"))?;
        if total < Decimal::ZERO {
            return Err(OrderError::Validation(format!(
                "total must not be negative, got {total}"
            )));
        }

        Ok(ValidIntake {
            tenant_id,
            user_id,
            user_info: self
                .user_info
                .filter(|info| !info.is_null())
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            items,
            notes: self.notes.unwrap_or_default(),
            payment_method: self
                .payment_method
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| defaults.payment_method.clone()),
            total,
            estimated_preparation_time: self
                .estimated_preparation_time
                .unwrap_or(defaults.preparation_minutes),
            request_id: self.request_id,
        })
    }
}

fn missing(field: &str) -> OrderError {
    OrderError::Validation(format!("{field} is required"))
}
