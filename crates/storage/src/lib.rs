//! Object storage for venue and event media.
//!
//! [`ObjectStore`] is the backend seam (local filesystem, S3-compatible,
//! in-memory); [`MediaRepository`] applies the owner path convention on top.

pub mod backend;
pub mod config;
pub mod error;
pub mod media_repository;

use std::sync::Arc;

pub use backend::{InMemoryObjectStore, LocalObjectStore, ObjectStore, S3ObjectStore};
pub use config::{S3Settings, StorageBackend, StorageConfig};
pub use error::StorageError;
pub use media_repository::MediaRepository;

/// Build the configured backend and wrap it in a [`MediaRepository`].
pub async fn connect(config: &StorageConfig) -> Result<MediaRepository, StorageError> {
    let store: Arc<dyn ObjectStore> = match &config.backend {
        StorageBackend::Local {
            root,
            public_base_url,
        } => {
            tokio::fs::create_dir_all(root).await?;
            tracing::info!(root = %root.display(), "Local object store configured");
            Arc::new(LocalObjectStore::new(root.clone(), public_base_url.clone()))
        }
        StorageBackend::S3(settings) => Arc::new(S3ObjectStore::connect(settings).await),
        StorageBackend::Memory { public_base_url } => {
            tracing::warn!("In-memory object store configured; media is lost on restart");
            Arc::new(InMemoryObjectStore::new(public_base_url.clone()))
        }
    };
    Ok(MediaRepository::new(store, config.upsert))
}
