use async_trait::async_trait;

use super::error::StorageError;
use super::location::ObjectLocation;

/// Bucketed object storage that hands out public URLs for what it stores.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` at `location`, replacing nothing: keys are generated fresh
    /// for every upload.
    async fn put(
        &self,
        location: &ObjectLocation,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Retrieve all bytes of an object.
    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError>;

    /// Check whether an object exists.
    async fn exists(&self, location: &ObjectLocation) -> Result<bool, StorageError>;

    /// Delete an object. Returns `false` if it was already gone.
    async fn delete(&self, location: &ObjectLocation) -> Result<bool, StorageError>;

    /// Base that public URLs of this store are rooted at.
    fn public_base_url(&self) -> &str;

    /// Publicly fetchable URL of an object.
    fn public_url(&self, location: &ObjectLocation) -> String {
        location.public_url(self.public_base_url())
    }

    /// Map a public URL back to the object it names, if it belongs to this store.
    fn locate(&self, url: &str) -> Option<ObjectLocation> {
        ObjectLocation::from_public_url(url, self.public_base_url())
    }
}
