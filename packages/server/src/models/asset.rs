use common::upload::UploadReceipt;
use serde::Serialize;

/// Outcome of an orchestrated upload.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetUploadResponse {
    /// Public URL of the stored object.
    #[schema(example = "http://127.0.0.1:3000/media/slides/0b6f0f0e-8d3c-4d8e-9d7b-6c1f3e2a9b10.png")]
    pub url: String,
    #[schema(example = "slides")]
    pub bucket: String,
    /// Generated object key, `<uuid>.<ext>`.
    #[schema(example = "0b6f0f0e-8d3c-4d8e-9d7b-6c1f3e2a9b10.png")]
    pub key: String,
    #[schema(example = 2097152)]
    pub size: u64,
    #[schema(example = "image/png")]
    pub content_type: String,
    /// Store attempts it took, including the successful one.
    #[schema(example = 1)]
    pub attempts: u8,
    /// URL that the owner record pointed at before, now being reclaimed.
    pub replaced: Option<String>,
}

impl From<UploadReceipt> for AssetUploadResponse {
    fn from(receipt: UploadReceipt) -> Self {
        let asset = receipt.asset;
        Self {
            url: asset.url,
            bucket: asset.bucket,
            key: asset.key.as_str().to_string(),
            size: asset.size,
            content_type: asset.content_type,
            attempts: receipt.attempts,
            replaced: receipt.replaced,
        }
    }
}

/// Result of clearing a record's image.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AssetClearedResponse {
    /// URL that was unlinked and queued for deletion, if any.
    pub removed: Option<String>,
}
