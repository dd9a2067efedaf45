//! Error types for the order lifecycle.

use crate::model::OrderStatus;
use http::StatusCode;
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Callers match on the variant, never on the message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Malformed or missing input. Never retried.
    #[error("Order validation error: {0}")]
    Validation(String),

    /// Unknown order, or one that belongs to another tenant.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The requested move is not an edge of the lifecycle graph.
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Another writer moved the order first. Re-read, re-validate, then retry.
    #[error("Order {0} was modified concurrently")]
    ConcurrentModification(String),

    /// The order store failed or is unavailable. Not retried here.
    #[error("Order store error: {0}")]
    Persistence(String),
}

impl OrderError {
    /// HTTP status a client-facing adapter should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTransition { .. } | Self::ConcurrentModification(_) => {
                StatusCode::CONFLICT
            }
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True when re-reading and retrying may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrentModification(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            OrderError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OrderError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            OrderError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Created
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            OrderError::ConcurrentModification("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            OrderError::Persistence("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_only_concurrent_modification_is_retryable() {
        assert!(OrderError::ConcurrentModification("x".into()).is_retryable());
        assert!(!OrderError::Persistence("x".into()).is_retryable());
    }
}
