use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

/// Longest extension carried over from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 8;

/// A generated, flat object key of the form `<uuid>.<ext>`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Generate a fresh collision-resistant key for an upload.
    ///
    /// The caller-supplied file name only contributes its extension; when it has
    /// none usable, the extension is derived from the MIME type.
    pub fn generate(file_name: &str, content_type: &str) -> Self {
        let ext = extension_from_name(file_name)
            .or_else(|| extension_for_mime(content_type).map(str::to_string))
            .unwrap_or_else(|| "bin".to_string());
        Self(format!("{}.{ext}", Uuid::new_v4()))
    }

    /// Parse an existing key, rejecting anything that could escape its bucket.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.is_empty() || s.len() > 255 {
            return Err(StorageError::InvalidLocation(format!(
                "key must be 1-255 characters, got {}",
                s.len()
            )));
        }
        if s.starts_with('.') {
            return Err(StorageError::InvalidLocation(
                "key must not start with '.'".into(),
            ));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(StorageError::InvalidLocation(format!(
                "key contains invalid characters: {s}"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The extension part of the key, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(_, ext)| ext)
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

/// A bucket plus a key: the full address of one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: ObjectKey,
}

impl ObjectLocation {
    pub fn new(bucket: &str, key: ObjectKey) -> Result<Self, StorageError> {
        validate_bucket(bucket)?;
        Ok(Self {
            bucket: bucket.to_string(),
            key,
        })
    }

    /// Parse `<bucket>/<key>`.
    pub fn parse(path: &str) -> Result<Self, StorageError> {
        let (bucket, key) = path
            .split_once('/')
            .ok_or_else(|| StorageError::InvalidLocation(format!("missing key in {path}")))?;
        Self::new(bucket, ObjectKey::parse(key)?)
    }

    /// Resolve the location behind a public URL minted under `public_base_url`.
    ///
    /// Returns `None` for URLs that do not belong to this store.
    pub fn from_public_url(url: &str, public_base_url: &str) -> Option<Self> {
        let base = public_base_url.trim_end_matches('/');
        let rest = url.strip_prefix(base)?.strip_prefix('/')?;
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        Self::parse(rest).ok()
    }

    /// Render the public URL of this location under `public_base_url`.
    pub fn public_url(&self, public_base_url: &str) -> String {
        format!(
            "{}/{}/{}",
            public_base_url.trim_end_matches('/'),
            self.bucket,
            self.key
        )
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Bucket names follow the S3 subset: 3-63 chars of `a-z`, `0-9` and `-`.
pub fn validate_bucket(name: &str) -> Result<(), StorageError> {
    if name.len() < 3 || name.len() > 63 {
        return Err(StorageError::InvalidLocation(format!(
            "bucket name must be 3-63 characters: {name}"
        )));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(StorageError::InvalidLocation(format!(
            "bucket name must not start or end with '-': {name}"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(StorageError::InvalidLocation(format!(
            "bucket name contains invalid characters: {name}"
        )));
    }
    Ok(())
}

fn extension_from_name(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.trim().rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Canonical extension for the image types the site accepts.
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}
