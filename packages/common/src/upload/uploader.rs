use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use super::validator::FileCandidate;
use crate::storage::{ObjectKey, ObjectLocation, ObjectStore, StorageError};

/// A stored asset and the public URL it is reachable under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRef {
    pub bucket: String,
    pub key: ObjectKey,
    pub url: String,
    pub size: u64,
    pub content_type: String,
}

/// Writes one file to one bucket. Exactly one store call per `upload`.
#[derive(Clone)]
pub struct Uploader {
    store: Arc<dyn ObjectStore>,
}

impl Uploader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, file), fields(size = file.size()))]
    pub async fn upload(&self, bucket: &str, file: &FileCandidate) -> Result<AssetRef, StorageError> {
        let content_type = file.normalized_type();
        let key = ObjectKey::generate(&file.file_name, &content_type);
        let location = ObjectLocation::new(bucket, key)?;

        self.store.put(&location, &file.data, &content_type).await?;
        let url = self.store.public_url(&location);
        debug!(%location, %url, "Object stored");

        Ok(AssetRef {
            bucket: location.bucket,
            key: location.key,
            url,
            size: file.size(),
            content_type,
        })
    }
}
