//! Site-specific wiring of the upload workflow: which records own assets,
//! where their files go, and how links are written to the database.

mod kind;
mod linker;
mod store;

pub use kind::{OwnerKind, OwnerRef};
pub use linker::RecordLinker;
pub use store::build_object_store;
