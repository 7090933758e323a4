//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::StoreFormat { .. } => crate::exitcode::DATAERR,
                InfraError::Application(app) => application_exit_code(app),
            },
        }
    }
}

fn application_exit_code(e: &ApplicationError) -> i32 {
    match e {
        ApplicationError::TreeNotFound(_) => crate::exitcode::NOINPUT,
        ApplicationError::InvalidTitle(_) => crate::exitcode::USAGE,
        ApplicationError::Config { .. } => crate::exitcode::CONFIG,
        ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
        ApplicationError::Domain(domain) => match domain {
            DomainError::NodeNotFound(_) => crate::exitcode::NOINPUT,
            DomainError::ForbiddenDeleteRoot(_)
            | DomainError::ForbiddenDeleteWithChildren(_)
            | DomainError::ForbiddenMoveRoot(_)
            | DomainError::ForbiddenMoveIntoSubtree { .. } => crate::exitcode::NOPERM,
            DomainError::RootHasNoParent(_) => crate::exitcode::SOFTWARE,
            DomainError::DanglingParentReference { .. }
            | DomainError::DuplicateRecord(_)
            | DomainError::CycleDetected(_) => crate::exitcode::DATAERR,
        },
    }
}
