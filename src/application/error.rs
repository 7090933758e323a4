//! Application-level errors (wraps domain errors)

use thiserror::Error;
use uuid::Uuid;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("department tree with root id {0} not found")]
    TreeNotFound(Uuid),

    #[error("invalid department title: {0:?}")]
    InvalidTitle(String),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// True when the requested department or tree does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApplicationError::TreeNotFound(_)
                | ApplicationError::Domain(DomainError::NodeNotFound(_))
        )
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
