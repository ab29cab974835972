use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::location::ObjectLocation;
use super::traits::ObjectStore;

/// Filesystem-backed object store.
///
/// Objects live at `{base_path}/{bucket}/{key}`. Writes go to
/// `{base_path}/.tmp` first and are renamed into place, so readers never
/// observe a partially written object.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(
        base_path: PathBuf,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into(),
            max_size,
        })
    }

    fn object_path(&self, location: &ObjectLocation) -> PathBuf {
        self.base_path
            .join(&location.bucket)
            .join(location.key.as_str())
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(
        &self,
        location: &ObjectLocation,
        data: &[u8],
        _content_type: &str,
    ) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let object_path = self.object_path(location);
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.object_path(location)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(location.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, location: &ObjectLocation) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.object_path(location)).await?)
    }

    async fn delete(&self, location: &ObjectLocation) -> Result<bool, StorageError> {
        match fs::remove_file(self.object_path(location)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}
