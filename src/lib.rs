//! orgtree: department hierarchies as tree aggregates
//!
//! Flat `(id, title, parent_id)` records are built into a forest of
//! [`domain::DepartmentTreeAggregate`]s, queried and mutated under the tree
//! invariants, and flattened back into parent-first record lists.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
