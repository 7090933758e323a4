//! Error conversion helpers for store operations
//!
//! Provides an extension trait for cleaner error handling with operation context.

use std::io;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add context to a store I/O error.
    ///
    /// # Example
    /// ```ignore
    /// self.store.delete_record(id)
    ///     .with_store_context("delete department", id)?;
    /// ```
    fn with_store_context(
        self,
        action: &str,
        subject: impl std::fmt::Display,
    ) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_store_context(
        self,
        action: &str,
        subject: impl std::fmt::Display,
    ) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, subject),
            source: Box::new(e),
        })
    }
}
