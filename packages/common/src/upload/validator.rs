//! Type and size checks run before any bytes leave the process.

use super::error::ValidationError;

/// Ceiling for photos of people (member avatars, mentor photos).
pub const AVATAR_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Ceiling for every other asset.
pub const DEFAULT_MAX_BYTES: u64 = 15 * 1024 * 1024;

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_GIF: &str = "image/gif";
pub const IMAGE_WEBP: &str = "image/webp";
pub const IMAGE_SVG: &str = "image/svg+xml";

const RASTER_TYPES: [&str; 4] = [IMAGE_JPEG, IMAGE_PNG, IMAGE_GIF, IMAGE_WEBP];

/// A file offered for upload.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    /// Name the client gave the file. Only its extension is ever used.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    pub data: Vec<u8>,
}

impl FileCandidate {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Declared MIME type, lower-cased and without parameters.
    pub fn normalized_type(&self) -> String {
        normalize_content_type(&self.content_type)
    }
}

/// Allowed MIME types plus a byte ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPolicy {
    allowed_types: Vec<&'static str>,
    pub max_bytes: u64,
}

impl AssetPolicy {
    /// JPEG, PNG, GIF and WEBP up to `max_bytes`.
    pub fn raster(max_bytes: u64) -> Self {
        Self {
            allowed_types: RASTER_TYPES.to_vec(),
            max_bytes,
        }
    }

    /// Additionally accept SVG.
    pub fn with_svg(mut self) -> Self {
        if !self.allowed_types.contains(&IMAGE_SVG) {
            self.allowed_types.push(IMAGE_SVG);
        }
        self
    }

    pub fn allowed_types(&self) -> &[&'static str] {
        &self.allowed_types
    }

    pub fn allows(&self, content_type: &str) -> bool {
        let normalized = normalize_content_type(content_type);
        self.allowed_types.iter().any(|t| *t == normalized)
    }
}

/// Check a candidate against a policy. Type is checked before size.
pub fn validate(file: &FileCandidate, policy: &AssetPolicy) -> Result<(), ValidationError> {
    if !policy.allows(&file.content_type) {
        return Err(ValidationError::InvalidType {
            content_type: file.content_type.clone(),
            allowed: policy.allowed_types.join(", "),
        });
    }

    if file.size() > policy.max_bytes {
        return Err(ValidationError::TooLarge {
            actual: file.size(),
            limit: policy.max_bytes,
        });
    }

    Ok(())
}

/// `"Image/PNG; charset=binary"` becomes `"image/png"`.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
