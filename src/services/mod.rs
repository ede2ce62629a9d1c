use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod list_controller;

/// Failure surfaced to the presentation layer by a controller intent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Credential missing, expired or rejected; the operator must log in again.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("vehicle not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error: {0}")]
    Server(String),

    /// The request was abandoned before it settled.
    #[error("request cancelled")]
    Cancelled,

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Transient failures the UI offers to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Network(_) | ServiceError::Server(_) | ServiceError::Cancelled
        )
    }

    pub fn requires_login(&self) -> bool {
        matches!(self, ServiceError::Unauthorized(_))
    }

    /// Message shown to the operator for a failed `operation` ("load vehicles",
    /// "update vehicle", ...).
    pub fn user_message(&self, operation: &str) -> String {
        match self {
            ServiceError::Unauthorized(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            ServiceError::NotFound if operation == list_controller::LOAD => {
                format!("Failed to {operation}: the requested page no longer exists.")
            }
            ServiceError::NotFound => {
                format!("Failed to {operation}: the vehicle no longer exists.")
            }
            ServiceError::Validation(reason) => format!("Failed to {operation}: {reason}"),
            ServiceError::Network(_) | ServiceError::Server(_) => {
                format!("Failed to {operation}. Please try again.")
            }
            ServiceError::Cancelled => format!("Request to {operation} was cancelled."),
            ServiceError::Unexpected(_) => format!("Failed to {operation}."),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Network(msg) => ServiceError::Network(msg),
            RepositoryError::Auth(msg) => ServiceError::Unauthorized(msg),
            RepositoryError::Validation(msg) => ServiceError::Validation(msg),
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Server(msg) => ServiceError::Server(msg),
            RepositoryError::Unexpected(msg) => ServiceError::Unexpected(msg),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}
