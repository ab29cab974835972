//! Asset upload and lifecycle workflow.
//!
//! A file is checked by the [validator], written under a fresh key by the
//! [`Uploader`], pointed at from its owner record by an [`AssetLinker`], and
//! whatever the owner referenced before is handed to the [`Reclaimer`].
//! [`UploadOrchestrator`] sequences those steps with bounded retry.

mod error;
mod linker;
mod orchestrator;
mod reclaimer;
mod uploader;
pub mod validator;

pub use error::{LinkError, UploadError, ValidationError};
pub use linker::AssetLinker;
pub use orchestrator::{
    NoProgress, ProgressSink, UploadOrchestrator, UploadReceipt, UploadRequest, UploadStage,
};
pub use reclaimer::{ReclaimHandle, ReclaimOutcome, Reclaimer, ReferenceCheck};
pub use uploader::{AssetRef, Uploader};
pub use validator::{AssetPolicy, FileCandidate, validate};
