use std::sync::Arc;

use common::config::{StorageBackend, StorageConfig};
use common::storage::filesystem::FilesystemObjectStore;
use common::storage::memory::MemoryObjectStore;
use common::storage::s3::S3ObjectStore;
use common::storage::{ObjectStore, StorageError};
use tracing::info;

/// Build the configured object store backend.
pub async fn build_object_store(
    config: &StorageConfig,
) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let base = config.public_base_url.trim_end_matches('/').to_string();
    let store: Arc<dyn ObjectStore> = match config.backend {
        StorageBackend::Filesystem => {
            info!(path = %config.base_path.display(), "Using filesystem object store");
            Arc::new(
                FilesystemObjectStore::new(
                    config.base_path.clone(),
                    base,
                    config.max_object_size,
                )
                .await?,
            )
        }
        StorageBackend::Memory => {
            info!("Using in-memory object store");
            Arc::new(MemoryObjectStore::new(base))
        }
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                StorageError::Backend("storage.backend = \"s3\" requires a [storage.s3] section".into())
            })?;
            info!(endpoint = ?s3.endpoint, region = %s3.region, "Using S3 object store");
            Arc::new(S3ObjectStore::new(s3, base)?)
        }
    };
    Ok(store)
}
