//! Entity repository with a per-session read cache.
//!
//! The cache is never a source of truth. Creations are appended after the
//! store accepts them and media updates replace entries that are already
//! cached; an entity the session never saw stays uncached until
//! [`EntityRepository::refresh`]. [`EntityRepository::invalidate`] empties
//! it. Failed writes leave it untouched.

use std::sync::Arc;

use tokio::sync::RwLock;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::{NewEvent, NewVenue};
use touchgrass_db::models::event::{Event, EventWithRelations};
use touchgrass_db::models::venue::Venue;

use crate::error::PersistenceError;
use crate::store::EntityStore;

#[derive(Debug, Default)]
struct SessionCache {
    venues: Vec<Venue>,
    events: Vec<EventWithRelations>,
}

pub struct EntityRepository {
    store: Arc<dyn EntityStore>,
    cache: RwLock<SessionCache>,
}

impl EntityRepository {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(SessionCache::default()),
        }
    }

    /// The underlying store, for reads and writes that bypass the cache.
    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    pub async fn create_venue(&self, input: &NewVenue) -> Result<Venue, PersistenceError> {
        let venue = self.store.create_venue(input).await?;
        tracing::info!(venue_id = %venue.id, name = %venue.name, "Venue created");
        self.cache.write().await.venues.push(venue.clone());
        Ok(venue)
    }

    pub async fn create_event(
        &self,
        input: &NewEvent,
    ) -> Result<EventWithRelations, PersistenceError> {
        let event = self.store.create_event(input).await?;
        tracing::info!(
            event_id = %event.event.id,
            venue_id = %event.event.venue_id,
            "Event created"
        );
        self.cache.write().await.events.push(event.clone());
        Ok(event)
    }

    pub async fn set_venue_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Venue, PersistenceError> {
        let venue = self.store.set_venue_media(id, urls).await?;
        if let Some(cached) = self
            .cache
            .write()
            .await
            .venues
            .iter_mut()
            .find(|v| v.id == id)
        {
            *cached = venue.clone();
        }
        Ok(venue)
    }

    pub async fn set_event_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Event, PersistenceError> {
        let event = self.store.set_event_media(id, urls).await?;
        if let Some(cached) = self
            .cache
            .write()
            .await
            .events
            .iter_mut()
            .find(|e| e.event.id == id)
        {
            cached.event = event.clone();
        }
        Ok(event)
    }

    /// All venues from the store, ordered by name.
    pub async fn list_venues(&self) -> Result<Vec<Venue>, PersistenceError> {
        self.store.list_venues().await
    }

    /// All events from the store, ordered by start date, relations expanded.
    pub async fn list_events(&self) -> Result<Vec<EventWithRelations>, PersistenceError> {
        self.store.list_events().await
    }

    /// Reload both cached lists from the store.
    ///
    /// On error the previous cache contents are kept.
    pub async fn refresh(&self) -> Result<(), PersistenceError> {
        let venues = self.store.list_venues().await?;
        let events = self.store.list_events().await?;
        let mut cache = self.cache.write().await;
        cache.venues = venues;
        cache.events = events;
        tracing::debug!(
            venues = cache.venues.len(),
            events = cache.events.len(),
            "Session cache refreshed"
        );
        Ok(())
    }

    pub async fn invalidate(&self) {
        *self.cache.write().await = SessionCache::default();
    }

    pub async fn cached_venues(&self) -> Vec<Venue> {
        self.cache.read().await.venues.clone()
    }

    pub async fn cached_events(&self) -> Vec<EventWithRelations> {
        self.cache.read().await.events.clone()
    }
}
