//! Persistence seam for the workflow.
//!
//! [`EntityStore`] is what the repository and orchestrator talk to;
//! [`PgEntityStore`] backs it with the `touchgrass-db` repositories and
//! [`MemoryEntityStore`] keeps everything in process for tests and demos.

mod memory;
mod postgres;

pub use memory::MemoryEntityStore;
pub use postgres::PgEntityStore;

use async_trait::async_trait;
use touchgrass_core::ticket_status::TicketStatus;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::{NewAddOn, NewEvent, NewTicketType, NewVenue};
use touchgrass_db::models::add_on::{AddOn, AttachAddOn, EventAddOn};
use touchgrass_db::models::event::{Event, EventWithRelations};
use touchgrass_db::models::ticket::{CreateTicket, Ticket};
use touchgrass_db::models::ticket_type::TicketType;
use touchgrass_db::models::venue::Venue;

use crate::error::PersistenceError;

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn create_venue(&self, input: &NewVenue) -> Result<Venue, PersistenceError>;

    /// Insert an event and its default ticket type, returning it expanded.
    ///
    /// A `venue_id` with no matching venue is [`PersistenceError::Referential`].
    async fn create_event(&self, input: &NewEvent) -> Result<EventWithRelations, PersistenceError>;

    /// All venues ordered by name, ignoring case.
    async fn list_venues(&self) -> Result<Vec<Venue>, PersistenceError>;

    /// All events ordered by start date, each with venue, ticket types and add-ons.
    async fn list_events(&self) -> Result<Vec<EventWithRelations>, PersistenceError>;

    async fn find_venue(&self, id: EntityId) -> Result<Option<Venue>, PersistenceError>;

    async fn find_event(&self, id: EntityId)
        -> Result<Option<EventWithRelations>, PersistenceError>;

    /// Replace a venue's media URL list.
    async fn set_venue_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Venue, PersistenceError>;

    /// Replace an event's media URL list.
    async fn set_event_media(
        &self,
        id: EntityId,
        urls: &[String],
    ) -> Result<Event, PersistenceError>;

    async fn create_ticket_type(
        &self,
        input: &NewTicketType,
    ) -> Result<TicketType, PersistenceError>;

    async fn create_add_on(&self, input: &NewAddOn) -> Result<AddOn, PersistenceError>;

    async fn attach_add_on(
        &self,
        event_id: EntityId,
        input: &AttachAddOn,
    ) -> Result<EventAddOn, PersistenceError>;

    async fn create_ticket(&self, input: &CreateTicket) -> Result<Ticket, PersistenceError>;

    /// Move a ticket to `to` if its current status allows it.
    async fn transition_ticket(
        &self,
        id: EntityId,
        to: TicketStatus,
    ) -> Result<Ticket, PersistenceError>;

    /// Role name assigned to a user, if any.
    async fn user_role(&self, user_id: EntityId) -> Result<Option<String>, PersistenceError>;

    /// Cheap reachability check.
    async fn health(&self) -> Result<(), PersistenceError>;
}
