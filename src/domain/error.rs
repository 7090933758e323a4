//! Domain-level errors (no external dependencies)

use thiserror::Error;
use uuid::Uuid;

/// Domain errors represent violations of the department tree invariants.
/// None of them is transient: they signal data corruption or a rejected operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("department {id} references missing parent {parent_id}")]
    DanglingParentReference { id: Uuid, parent_id: Uuid },

    #[error("duplicate department record: {0}")]
    DuplicateRecord(Uuid),

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(Uuid),

    #[error("department tree node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("department {0} is a root and has no parent")]
    RootHasNoParent(Uuid),

    #[error("cannot delete root department: {0}")]
    ForbiddenDeleteRoot(Uuid),

    #[error("cannot delete department with children: {0}")]
    ForbiddenDeleteWithChildren(Uuid),

    #[error("cannot move root department: {0}")]
    ForbiddenMoveRoot(Uuid),

    #[error("cannot move department {id} into its own subtree (below {new_parent_id})")]
    ForbiddenMoveIntoSubtree { id: Uuid, new_parent_id: Uuid },
}

impl DomainError {
    /// True for the errors raised when a removal is refused.
    pub fn is_forbidden_delete(&self) -> bool {
        matches!(
            self,
            DomainError::ForbiddenDeleteRoot(_) | DomainError::ForbiddenDeleteWithChildren(_)
        )
    }

    /// True for the errors raised when a move is refused.
    pub fn is_forbidden_move(&self) -> bool {
        matches!(
            self,
            DomainError::ForbiddenMoveRoot(_) | DomainError::ForbiddenMoveIntoSubtree { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
