use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::error::UploadError;
use super::linker::AssetLinker;
use super::reclaimer::{ReclaimHandle, Reclaimer};
use super::uploader::{AssetRef, Uploader};
use super::validator::{AssetPolicy, FileCandidate, validate};
use crate::retry::{RetryDecision, RetryPolicy, RetryState};
use crate::storage::ObjectStore;

/// Where one upload workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    Validating,
    Uploading { attempt: u8 },
    Linking,
    Done,
    Failed,
}

impl UploadStage {
    /// Coarse progress percentage reported on entering the stage.
    pub fn progress(&self) -> u8 {
        match self {
            UploadStage::Idle | UploadStage::Failed => 0,
            UploadStage::Validating => 10,
            UploadStage::Uploading { .. } => 30,
            UploadStage::Linking => 80,
            UploadStage::Done => 100,
        }
    }
}

/// Receives stage transitions of an upload.
pub trait ProgressSink: Send + Sync {
    fn report(&self, stage: UploadStage, percent: u8);
}

impl<F> ProgressSink for F
where
    F: Fn(UploadStage, u8) + Send + Sync,
{
    fn report(&self, stage: UploadStage, percent: u8) {
        self(stage, percent)
    }
}

/// Discards progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _stage: UploadStage, _percent: u8) {}
}

/// One user-initiated upload.
pub struct UploadRequest<'a, O> {
    pub bucket: &'a str,
    pub policy: &'a AssetPolicy,
    pub file: &'a FileCandidate,
    /// Record to link the asset into. `None` only stores the asset.
    pub owner: Option<&'a O>,
}

/// Successful result of an upload workflow.
#[derive(Debug)]
pub struct UploadReceipt {
    pub asset: AssetRef,
    /// Upload attempts it took, including the successful one.
    pub attempts: u8,
    pub linked: bool,
    /// The reference the owner held before, when it differed from the new one.
    pub replaced: Option<String>,
    /// Background deletion of `replaced`. Safe to drop.
    pub reclaim: Option<ReclaimHandle>,
}

/// Sequences validate, upload (with retry), link and reclaim.
pub struct UploadOrchestrator<L> {
    uploader: Uploader,
    linker: L,
    reclaimer: Reclaimer,
    policy: RetryPolicy,
    compensate_on_link_failure: bool,
}

impl<L: AssetLinker> UploadOrchestrator<L> {
    pub fn new(store: Arc<dyn ObjectStore>, linker: L, policy: RetryPolicy) -> Self {
        Self {
            uploader: Uploader::new(store.clone()),
            linker,
            reclaimer: Reclaimer::new(store),
            policy,
            compensate_on_link_failure: false,
        }
    }

    /// Delete the fresh upload again when linking it fails.
    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate_on_link_failure = enabled;
        self
    }

    /// Reclaim replaced and compensated objects through `reclaimer` instead
    /// of a bare one over the same store.
    pub fn with_reclaimer(mut self, reclaimer: Reclaimer) -> Self {
        self.reclaimer = reclaimer;
        self
    }

    pub fn linker(&self) -> &L {
        &self.linker
    }

    pub fn reclaimer(&self) -> &Reclaimer {
        &self.reclaimer
    }

    /// Run the workflow to a terminal state.
    ///
    /// The linker is only called after the store confirmed the upload. On any
    /// error, progress is reset to `Failed`/0 before returning.
    #[instrument(skip_all, fields(bucket = request.bucket, file = %request.file.file_name))]
    pub async fn run(
        &self,
        request: UploadRequest<'_, L::Owner>,
        progress: &dyn ProgressSink,
    ) -> Result<UploadReceipt, UploadError> {
        let result = self.drive(request, progress).await;
        if let Err(e) = &result {
            warn!(error = %e, "Upload workflow failed");
            progress.report(UploadStage::Failed, UploadStage::Failed.progress());
        }
        result
    }

    async fn drive(
        &self,
        request: UploadRequest<'_, L::Owner>,
        progress: &dyn ProgressSink,
    ) -> Result<UploadReceipt, UploadError> {
        enter(progress, UploadStage::Validating);
        validate(request.file, request.policy)?;

        let (asset, attempts) = self
            .upload_with_retry(request.bucket, request.file, progress)
            .await?;

        let Some(owner) = request.owner else {
            enter(progress, UploadStage::Done);
            return Ok(UploadReceipt {
                asset,
                attempts,
                linked: false,
                replaced: None,
                reclaim: None,
            });
        };

        enter(progress, UploadStage::Linking);
        let previous = match self.linker.link(owner, &asset.url).await {
            Ok(previous) => previous,
            Err(source) => {
                if self.compensate_on_link_failure {
                    self.reclaimer.reclaim_now(&asset.url).await;
                }
                return Err(UploadError::Link { asset, source });
            }
        };

        let reclaim = self
            .reclaimer
            .reclaim_replaced(previous.as_deref(), Some(&asset.url));
        let replaced = reclaim.as_ref().map(|h| h.url().to_string());
        info!(url = %asset.url, ?owner, attempts, "Asset linked");

        enter(progress, UploadStage::Done);
        Ok(UploadReceipt {
            asset,
            attempts,
            linked: true,
            replaced,
            reclaim,
        })
    }

    async fn upload_with_retry(
        &self,
        bucket: &str,
        file: &FileCandidate,
        progress: &dyn ProgressSink,
    ) -> Result<(AssetRef, u8), UploadError> {
        let mut retry = RetryState::new(self.policy);
        loop {
            let attempt = retry.start_attempt();
            enter(progress, UploadStage::Uploading { attempt });

            let error = match self.uploader.upload(bucket, file).await {
                Ok(asset) => return Ok((asset, attempt)),
                Err(e) if !e.is_transient() => {
                    return Err(UploadError::Upload {
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => e,
            };

            match retry.record_failure(&error.to_string()) {
                RetryDecision::Retry {
                    next_attempt,
                    delay,
                } => {
                    warn!(attempt, next_attempt, ?delay, error = %error, "Upload attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Exhausted { .. } => {
                    return Err(UploadError::Upload {
                        attempts: retry.attempts(),
                        source: error,
                    });
                }
            }
        }
    }
}

fn enter(progress: &dyn ProgressSink, stage: UploadStage) {
    progress.report(stage, stage.progress());
}
