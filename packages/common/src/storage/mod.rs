mod error;
mod location;
mod traits;

pub mod filesystem;
pub mod memory;
#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use location::{ObjectKey, ObjectLocation, extension_for_mime, validate_bucket};
pub use traits::ObjectStore;
