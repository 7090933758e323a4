//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (DepartmentStore)
//! but are themselves concrete structs, not traits.

mod department;

pub use department::DepartmentService;
