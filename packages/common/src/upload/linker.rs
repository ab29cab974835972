use std::fmt::Debug;

use async_trait::async_trait;

use super::error::LinkError;

/// Writes asset references into owner records.
#[async_trait]
pub trait AssetLinker: Send + Sync {
    /// Identifies one owner record.
    type Owner: Debug + Send + Sync;

    /// Set the owner's asset reference (`None` clears it) and return the
    /// reference it held before.
    async fn replace(
        &self,
        owner: &Self::Owner,
        url: Option<&str>,
    ) -> Result<Option<String>, LinkError>;

    /// Point the owner at a freshly uploaded asset.
    async fn link(&self, owner: &Self::Owner, url: &str) -> Result<Option<String>, LinkError> {
        self.replace(owner, Some(url)).await
    }

    /// Drop the owner's asset reference.
    async fn unlink(&self, owner: &Self::Owner) -> Result<Option<String>, LinkError> {
        self.replace(owner, None).await
    }
}
