//! Object store backends.
//!
//! Every backend addresses objects by a relative `/`-separated path and can
//! resolve a stored path to a public URL. Listing returns full paths under a
//! prefix, not just the trailing file names.

mod local;
mod memory;
mod s3;

pub use local::LocalObjectStore;
pub use memory::{InMemoryObjectStore, StoredObject};
pub use s3::S3ObjectStore;

use async_trait::async_trait;

use crate::error::StorageError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`.
    ///
    /// With `upsert == false` an existing object is never replaced and
    /// [`StorageError::AlreadyExists`] is returned instead.
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<(), StorageError>;

    /// Paths of every object stored under `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Publicly fetchable URL for a stored path.
    fn public_url(&self, path: &str) -> String;

    /// Short backend name for logs.
    fn kind(&self) -> &'static str;
}
