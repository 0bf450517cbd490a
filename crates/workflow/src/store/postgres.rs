use async_trait::async_trait;
use touchgrass_core::ticket_status::TicketStatus;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::{NewAddOn, NewEvent, NewTicketType, NewVenue};
use touchgrass_db::models::add_on::{AddOn, AttachAddOn, EventAddOn};
use touchgrass_db::models::event::{Event, EventWithRelations};
use touchgrass_db::models::ticket::{CreateTicket, Ticket};
use touchgrass_db::models::ticket_type::TicketType;
use touchgrass_db::models::venue::Venue;
use touchgrass_db::repositories::{
    AddOnRepo, EventRepo, TicketRepo, TicketTypeRepo, UserRoleRepo, VenueRepo,
};
use touchgrass_db::DbPool;

use super::EntityStore;
use crate::error::PersistenceError;

/// [`EntityStore`] over the Postgres repositories.
#[derive(Debug, Clone)]
pub struct PgEntityStore {
    pool: DbPool,
}

impl PgEntityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn create_venue(&self, input: &NewVenue) -> Result<Venue, PersistenceError> {
        VenueRepo::create(&self.pool, input)
            .await
            .map_err(|e| PersistenceError::from_write(e, &[]))
    }

    async fn create_event(&self, input: &NewEvent) -> Result<EventWithRelations, PersistenceError> {
        let (event, _) = EventRepo::create(&self.pool, input)
            .await
            .map_err(|e| PersistenceError::from_write(e, &[("venue_id", "Venue", input.venue_id)]))?;

        EventRepo::find_with_relations(&self.pool, event.id)
            .await?
            .ok_or(PersistenceError::NotFound {
                entity: "Event",
                id: event.id,
            })
    }

    async fn list_venues(&self) -> Result<Vec<Venue>, PersistenceError> {
        Ok(VenueRepo::list(&self.pool).await?)
    }

    async fn list_events(&self) -> Result<Vec<EventWithRelations>, PersistenceError> {
        Ok(EventRepo::list_with_relations(&self.pool).await?)
    }

    async fn find_venue(&self, id: EntityId) -> Result<Option<Venue>, PersistenceError> {
        Ok(VenueRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_event(
        &self,
        id: EntityId,
    ) -> Result<Option<EventWithRelations>, PersistenceError> {
        Ok(EventRepo::find_with_relations(&self.pool, id).await?)
    }

    async fn set_venue_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Venue, PersistenceError> {
        VenueRepo::set_media_urls(&self.pool, id, urls)
            .await?
            .ok_or(PersistenceError::NotFound { entity: "Venue", id })
    }

    async fn set_event_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Event, PersistenceError> {
        EventRepo::set_media_urls(&self.pool, id, urls)
            .await?
            .ok_or(PersistenceError::NotFound { entity: "Event", id })
    }

    async fn create_ticket_type(
        &self,
        input: &NewTicketType,
    ) -> Result<TicketType, PersistenceError> {
        TicketTypeRepo::create(&self.pool, input)
            .await
            .map_err(|e| PersistenceError::from_write(e, &[("event_id", "Event", input.event_id)]))
    }

    async fn create_add_on(&self, input: &NewAddOn) -> Result<AddOn, PersistenceError> {
        AddOnRepo::create(&self.pool, input)
            .await
            .map_err(|e| PersistenceError::from_write(e, &[]))
    }

    async fn attach_add_on(
        &self,
        event_id: EntityId,
        input: &AttachAddOn,
    ) -> Result<EventAddOn, PersistenceError> {
        AddOnRepo::attach(&self.pool, event_id, input)
            .await
            .map_err(|e| {
                PersistenceError::from_write(
                    e,
                    &[
                        ("event_id", "Event", event_id),
                        ("add_on_id", "AddOn", input.add_on_id),
                    ],
                )
            })
    }

    async fn create_ticket(&self, input: &CreateTicket) -> Result<Ticket, PersistenceError> {
        TicketRepo::create(&self.pool, input).await.map_err(|e| {
            PersistenceError::from_write(e, &[("ticket_type_id", "TicketType", input.ticket_type_id)])
        })
    }

    async fn transition_ticket(
        &self,
        id: EntityId,
        to: TicketStatus,
    ) -> Result<Ticket, PersistenceError> {
        let ticket = TicketRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or(PersistenceError::NotFound { entity: "Ticket", id })?;
        let from = ticket.status()?;
        from.transition(to)?;

        TicketRepo::update_status(&self.pool, id, from, to)
            .await?
            .ok_or_else(|| {
                PersistenceError::Conflict(format!(
                    "Ticket {id} changed status while moving {from} -> {to}"
                ))
            })
    }

    async fn user_role(&self, user_id: EntityId) -> Result<Option<String>, PersistenceError> {
        Ok(UserRoleRepo::find_role(&self.pool, user_id).await?)
    }

    async fn health(&self) -> Result<(), PersistenceError> {
        Ok(touchgrass_db::health_check(&self.pool).await?)
    }
}
