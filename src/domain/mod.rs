//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod builder;
pub mod display;
pub mod entities;
pub mod error;
pub mod flatten;

pub use aggregate::{DepartmentTreeAggregate, PostOrderIterator, TreeIterator};
pub use builder::{build_trees, TreeBuilder};
pub use display::{TreeNodeConvert, MAX_RENDER_DEPTH};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use flatten::{flatten, flatten_subtree};
