//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::io;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::DepartmentService;
use crate::config::Settings;
use crate::infrastructure::traits::{DepartmentStore, TomlFileStore};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Flat record store
    pub store: Arc<dyn DepartmentStore>,

    /// Department tree use cases
    pub departments: DepartmentService,
}

impl ServiceContainer {
    /// Create a container backed by the TOML file at `settings.store_path`.
    ///
    /// The file is read once up front so a corrupt store is reported before
    /// any command runs.
    pub fn open(settings: Settings) -> InfraResult<Self> {
        let store = TomlFileStore::new(settings.store_path.clone());
        match store.fetch_all_records() {
            Ok(records) => debug!(
                "store {} holds {} records",
                store.path().display(),
                records.len()
            ),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(InfraError::StoreFormat {
                    path: store.path().to_path_buf(),
                    message: e.to_string(),
                })
            }
            Err(e) => {
                return Err(InfraError::io(
                    format!("read store {}", store.path().display()),
                    e,
                ))
            }
        }
        Ok(Self::with_deps(settings, Arc::new(store)))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, store: Arc<dyn DepartmentStore>) -> Self {
        let settings = Arc::new(settings);
        let departments =
            DepartmentService::new(store.clone()).with_child_order(settings.child_order);

        Self {
            settings,
            store,
            departments,
        }
    }
}
