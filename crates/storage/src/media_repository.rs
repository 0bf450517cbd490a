//! Entity media on top of an [`ObjectStore`].

use std::collections::BTreeSet;
use std::sync::Arc;

use touchgrass_core::media_path::{self, OwnerKind};
use touchgrass_core::staging::StagedFile;
use touchgrass_core::types::EntityId;

use crate::backend::ObjectStore;
use crate::error::StorageError;

#[derive(Clone)]
pub struct MediaRepository {
    store: Arc<dyn ObjectStore>,
    upsert: bool,
}

impl MediaRepository {
    pub fn new(store: Arc<dyn ObjectStore>, upsert: bool) -> Self {
        Self { store, upsert }
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Upload one staged file under its owner's prefix and return its public URL.
    pub async fn upload(
        &self,
        owner: OwnerKind,
        owner_id: EntityId,
        staged: &StagedFile,
    ) -> Result<String, StorageError> {
        let path = media_path::object_path(owner, owner_id, staged.kind, &staged.file.name);
        tracing::debug!(
            %owner,
            %owner_id,
            file = %staged.file.name,
            %path,
            size = staged.file.size(),
            backend = self.store.kind(),
            "Uploading media"
        );

        self.store
            .put(
                &path,
                staged.file.bytes.clone(),
                &staged.file.content_type,
                self.upsert,
            )
            .await?;
        Ok(self.store.public_url(&path))
    }

    /// Public URLs of every object stored for one owner, sorted and distinct.
    pub async fn list_urls(
        &self,
        owner: OwnerKind,
        owner_id: EntityId,
    ) -> Result<Vec<String>, StorageError> {
        let prefix = media_path::owner_prefix(owner, owner_id);
        let urls: BTreeSet<String> = self
            .store
            .list(&prefix)
            .await?
            .iter()
            .map(|path| self.store.public_url(path))
            .collect();
        Ok(urls.into_iter().collect())
    }
}

impl std::fmt::Debug for MediaRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaRepository")
            .field("backend", &self.store.kind())
            .field("upsert", &self.upsert)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use touchgrass_core::staging::{LocalFile, MediaStaging, StagingPolicy};

    use super::*;
    use crate::backend::InMemoryObjectStore;

    fn staged(files: Vec<LocalFile>) -> MediaStaging {
        let mut staging = MediaStaging::new(StagingPolicy::unrestricted());
        staging.add(files);
        staging
    }

    #[tokio::test]
    async fn upload_places_file_under_owner_prefix() {
        let store = Arc::new(InMemoryObjectStore::new("https://cdn.example/media"));
        let repo = MediaRepository::new(store.clone(), false);
        let venue_id = EntityId::new_v4();
        let staging = staged(vec![LocalFile::new("Front.JPG", "image/jpeg", vec![7; 4])]);

        let url = repo
            .upload(OwnerKind::Venue, venue_id, &staging.files()[0])
            .await
            .unwrap();

        let expected_prefix = format!("https://cdn.example/media/venues/{venue_id}/image-");
        assert!(url.starts_with(&expected_prefix), "{url}");
        assert!(url.ends_with(".jpg"), "{url}");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn list_urls_only_returns_owner_media() {
        let store = Arc::new(InMemoryObjectStore::default());
        let repo = MediaRepository::new(store, false);
        let mine = EntityId::new_v4();
        let other = EntityId::new_v4();
        let staging = staged(vec![
            LocalFile::new("a.png", "image/png", vec![1]),
            LocalFile::new("b.mp4", "video/mp4", vec![2]),
        ]);

        let mut uploaded = Vec::new();
        for file in staging.files() {
            uploaded.push(repo.upload(OwnerKind::Event, mine, file).await.unwrap());
        }
        repo.upload(OwnerKind::Event, other, &staging.files()[0])
            .await
            .unwrap();
        repo.upload(OwnerKind::Venue, mine, &staging.files()[0])
            .await
            .unwrap();

        uploaded.sort();
        assert_eq!(repo.list_urls(OwnerKind::Event, mine).await.unwrap(), uploaded);
    }

    #[tokio::test]
    async fn owner_without_media_lists_nothing() {
        let repo = MediaRepository::new(Arc::new(InMemoryObjectStore::default()), false);
        assert!(repo
            .list_urls(OwnerKind::Venue, EntityId::new_v4())
            .await
            .unwrap()
            .is_empty());
    }
}
