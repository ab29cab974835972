use thiserror::Error;

use super::uploader::AssetRef;
use crate::storage::StorageError;

/// Why a candidate file was refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unsupported file type '{content_type}' (allowed: {allowed})")]
    InvalidType {
        content_type: String,
        allowed: String,
    },

    #[error("File is too large ({actual} bytes, limit is {limit} bytes)")]
    TooLarge { actual: u64, limit: u64 },
}

/// Failure to point an owner record at an asset.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Owner record not found: {0}")]
    NotFound(String),

    #[error("Database update failed: {0}")]
    Database(String),
}

/// Terminal failure of one upload workflow run.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Upload failed after {attempts} attempt(s): {source}")]
    Upload {
        attempts: u8,
        #[source]
        source: StorageError,
    },

    /// The object is stored but its owner does not reference it.
    #[error("Uploaded asset could not be linked: {source}")]
    Link {
        asset: AssetRef,
        #[source]
        source: LinkError,
    },
}

impl UploadError {
    /// Message suitable for showing to the person who started the upload.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Invalid(ValidationError::InvalidType { allowed, .. }) => {
                format!("This file type is not supported. Please upload one of: {allowed}")
            }
            UploadError::Invalid(ValidationError::TooLarge { limit, .. }) => format!(
                "This file is too large. The maximum size is {} MB",
                limit / (1024 * 1024)
            ),
            UploadError::Upload { attempts, .. } => {
                format!("The upload failed after {attempts} attempt(s). Please try again")
            }
            UploadError::Link {
                source: LinkError::NotFound(_),
                ..
            } => "The record this image belongs to no longer exists".to_string(),
            UploadError::Link { .. } => {
                "The image was uploaded but could not be saved to the record".to_string()
            }
        }
    }
}
