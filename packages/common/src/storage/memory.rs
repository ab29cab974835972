use async_trait::async_trait;
use dashmap::DashMap;

use super::error::StorageError;
use super::location::ObjectLocation;
use super::traits::ObjectStore;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// In-process object store for development and tests.
pub struct MemoryObjectStore {
    objects: DashMap<ObjectLocation, StoredObject>,
    public_base_url: String,
}

impl MemoryObjectStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: DashMap::new(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Declared content type of a stored object.
    pub fn content_type(&self, location: &ObjectLocation) -> Option<String> {
        self.objects
            .get(location)
            .map(|entry| entry.content_type.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(
        &self,
        location: &ObjectLocation,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects.insert(
            location.clone(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        self.objects
            .get(location)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| StorageError::NotFound(location.to_string()))
    }

    async fn exists(&self, location: &ObjectLocation) -> Result<bool, StorageError> {
        Ok(self.objects.contains_key(location))
    }

    async fn delete(&self, location: &ObjectLocation) -> Result<bool, StorageError> {
        Ok(self.objects.remove(location).is_some())
    }

    fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}
