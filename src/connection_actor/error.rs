//! Error types for the connection registry.

use http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    /// Missing tenant, user or connection id, or an unknown role.
    #[error("Connection validation error: {0}")]
    Validation(String),

    /// The registry store failed or is unavailable.
    #[error("Connection registry error: {0}")]
    Persistence(String),
}

impl RegistryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
