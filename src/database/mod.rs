pub mod directory;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use directory::Directory;
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDirectory;
pub use models::{Membership, Organization, OrganizationRole};
pub use postgres::PgDirectory;

use std::sync::Arc;

use crate::config::{DatabaseConfig, DirectoryBackend, DirectoryConfig};

/// Build the configured directory backend.
pub fn directory_from_config(
    directory: &DirectoryConfig,
    database: &DatabaseConfig,
) -> Result<Arc<dyn Directory>, DatabaseError> {
    match directory.backend {
        DirectoryBackend::Memory => {
            let path = directory
                .fixtures
                .as_deref()
                .ok_or(DatabaseError::ConfigMissing("DIRECTORY_FIXTURES"))?;
            tracing::info!("Using in-memory directory from {}", path);
            Ok(Arc::new(MemoryDirectory::from_file(path)?))
        }
        DirectoryBackend::Postgres => {
            let manager = DatabaseManager::from_env(database.clone())?;
            Ok(Arc::new(PgDirectory::new(Arc::new(manager))))
        }
    }
}
