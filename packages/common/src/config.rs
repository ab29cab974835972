use std::path::PathBuf;

use serde::Deserialize;

/// Which object store backend the server talks to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    Memory,
    S3,
}

/// Object storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Default: filesystem.
    #[serde(default = "default_storage_backend")]
    pub backend: StorageBackend,
    /// Root directory of the filesystem backend. Default: "./data/objects".
    #[serde(default = "default_storage_base_path")]
    pub base_path: PathBuf,
    /// Prefix of every public asset URL. Default: "http://127.0.0.1:3000/media".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Hard cap enforced by the store itself, independent of upload policies.
    /// Default: 32 MiB.
    #[serde(default = "default_max_object_size")]
    pub max_object_size: u64,
    #[serde(default)]
    pub s3: Option<S3Config>,
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::Filesystem
}
fn default_storage_base_path() -> PathBuf {
    PathBuf::from("./data/objects")
}
fn default_public_base_url() -> String {
    "http://127.0.0.1:3000/media".into()
}
fn default_max_object_size() -> u64 {
    32 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            base_path: default_storage_base_path(),
            public_base_url: default_public_base_url(),
            max_object_size: default_max_object_size(),
            s3: None,
        }
    }
}

/// S3-compatible backend settings.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    /// Custom endpoint (MinIO, R2, ...). `None` uses the AWS endpoint for `region`.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_s3_region")]
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default)]
    pub path_style: bool,
}

fn default_s3_region() -> String {
    "us-east-1".into()
}

/// Backoff strategy between upload attempts.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    Fixed,
    Exponential,
}

/// Upload workflow configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Total upload attempts including the first. Default: 3.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u8,
    /// Delay between attempts (base delay for exponential). Default: 1000.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Cap for exponential backoff. Default: 10000.
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
    /// Default: fixed.
    #[serde(default = "default_backoff")]
    pub backoff: BackoffKind,
    /// Delete the freshly uploaded object when linking it fails. Default: false.
    #[serde(default)]
    pub compensate_on_link_failure: bool,
}

fn default_max_attempts() -> u8 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1000
}
fn default_retry_max_delay_ms() -> u64 {
    10_000
}
fn default_backoff() -> BackoffKind {
    BackoffKind::Fixed
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
            backoff: default_backoff(),
            compensate_on_link_failure: false,
        }
    }
}
