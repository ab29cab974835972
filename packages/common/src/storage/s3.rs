use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::location::ObjectLocation;
use super::traits::ObjectStore;
use crate::config::S3Config;

/// S3-compatible object store. Each site bucket maps to a bucket on the remote.
pub struct S3ObjectStore {
    region: Region,
    credentials: Credentials,
    path_style: bool,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(config: &S3Config, public_base_url: impl Into<String>) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            // Unknown names parse into a custom region whose endpoint is the
            // name itself, which never resolves.
            None => match config.region.parse::<Region>() {
                Ok(Region::Custom { .. }) | Err(_) => {
                    return Err(StorageError::Backend(format!(
                        "unknown region '{}'; set an endpoint for S3-compatible services",
                        config.region
                    )));
                }
                Ok(region) => region,
            },
        };
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        Ok(Self {
            region,
            credentials,
            path_style: config.path_style,
            public_base_url: public_base_url.into(),
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }
}

fn check_status(status: u16, location: &ObjectLocation) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(location.to_string())),
        code => Err(StorageError::Backend(format!(
            "unexpected status {code} for {location}"
        ))),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        location: &ObjectLocation,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket(&location.bucket)?
            .put_object_with_content_type(location.key.as_str(), data, content_type)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        debug!(%location, status = response.status_code(), "S3 put");
        check_status(response.status_code(), location)
    }

    async fn get(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        let response = self
            .bucket(&location.bucket)?
            .get_object(location.key.as_str())
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        check_status(response.status_code(), location)?;
        Ok(response.bytes().to_vec())
    }

    async fn exists(&self, location: &ObjectLocation) -> Result<bool, StorageError> {
        let (_, status) = self
            .bucket(&location.bucket)?
            .head_object(location.key.as_str())
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        match check_status(status, location) {
            Ok(()) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, location: &ObjectLocation) -> Result<bool, StorageError> {
        let response = self
            .bucket(&location.bucket)?
            .delete_object(location.key.as_str())
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        match check_status(response.status_code(), location) {
            Ok(()) => Ok(true),
            Err(StorageError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}
