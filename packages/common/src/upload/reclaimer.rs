use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::error::LinkError;
use crate::storage::ObjectStore;

/// Answers whether some owner record still points at a URL.
#[async_trait]
pub trait ReferenceCheck: Send + Sync {
    async fn is_referenced(&self, url: &str) -> Result<bool, LinkError>;
}

/// What a reclaim attempt ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReclaimOutcome {
    Deleted,
    /// Nothing was stored under the URL anymore.
    AlreadyGone,
    /// The URL does not point into this store (e.g. an external image link).
    Foreign,
    /// Another owner record still points at the object; it was kept.
    StillReferenced,
    /// The delete failed; the object stays orphaned.
    Failed,
}

/// A spawned reclaim. Dropping it leaves the task running.
#[derive(Debug)]
pub struct ReclaimHandle {
    url: String,
    handle: JoinHandle<ReclaimOutcome>,
}

impl ReclaimHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the reclaim to finish.
    pub async fn outcome(self) -> ReclaimOutcome {
        self.handle.await.unwrap_or(ReclaimOutcome::Failed)
    }
}

/// Best-effort deletion of assets no owner references anymore.
///
/// Failures are logged and swallowed: a leaked object is preferable to failing
/// the record update or delete that made it unreachable.
#[derive(Clone)]
pub struct Reclaimer {
    store: Arc<dyn ObjectStore>,
    references: Option<Arc<dyn ReferenceCheck>>,
}

impl Reclaimer {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            references: None,
        }
    }

    /// Keep objects that `references` still reports as in use. When the check
    /// itself fails the object is kept too.
    pub fn with_references(mut self, references: Arc<dyn ReferenceCheck>) -> Self {
        self.references = Some(references);
        self
    }

    /// Delete the object behind `url` on a background task.
    pub fn reclaim(&self, url: impl Into<String>) -> ReclaimHandle {
        let url = url.into();
        let reclaimer = self.clone();
        let task_url = url.clone();
        let handle = tokio::spawn(async move { reclaimer.reclaim_now(&task_url).await });
        ReclaimHandle { url, handle }
    }

    /// Reclaim `previous` if it was set and is no longer the current reference.
    pub fn reclaim_replaced(
        &self,
        previous: Option<&str>,
        current: Option<&str>,
    ) -> Option<ReclaimHandle> {
        let previous = previous.map(str::trim).filter(|p| !p.is_empty())?;
        if current.map(str::trim) == Some(previous) {
            return None;
        }
        Some(self.reclaim(previous))
    }

    /// Delete the object behind `url` on the current task.
    pub async fn reclaim_now(&self, url: &str) -> ReclaimOutcome {
        let Some(location) = self.store.locate(url) else {
            debug!(url, "Not reclaiming URL outside the object store");
            return ReclaimOutcome::Foreign;
        };

        if let Some(references) = &self.references {
            match references.is_referenced(url).await {
                Ok(false) => {}
                Ok(true) => {
                    debug!(%location, "Asset is still referenced, keeping it");
                    return ReclaimOutcome::StillReferenced;
                }
                Err(e) => {
                    warn!(%location, error = %e, "Could not check asset references, keeping it");
                    return ReclaimOutcome::Failed;
                }
            }
        }

        match self.store.delete(&location).await {
            Ok(true) => {
                info!(%location, "Reclaimed orphaned asset");
                ReclaimOutcome::Deleted
            }
            Ok(false) => {
                debug!(%location, "Orphaned asset was already gone");
                ReclaimOutcome::AlreadyGone
            }
            Err(e) => {
                warn!(%location, error = %e, "Failed to reclaim orphaned asset");
                ReclaimOutcome::Failed
            }
        }
    }
}
