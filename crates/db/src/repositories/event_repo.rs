//! Repository for the `events` table and the relation-expanded event reads.

use sqlx::PgPool;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::NewEvent;

use crate::models::event::{Event, EventWithRelations};
use crate::models::ticket_type::{TicketType, DEFAULT_TICKET_TYPE_NAME};
use crate::repositories::{AddOnRepo, TicketTypeRepo, VenueRepo};

const COLUMNS: &str =
    "id, name, description, start_date, end_date, venue_id, media_urls, created_at";

/// Provides create/read/update operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event together with its default ticket type in one transaction.
    ///
    /// The default ticket type is priced at `price_per_ticket` and capped at
    /// `number_of_tickets`. A missing venue fails the insert with a foreign
    /// key violation and nothing is written.
    pub async fn create(
        pool: &PgPool,
        input: &NewEvent,
    ) -> Result<(Event, TicketType), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO events (name, description, start_date, end_date, venue_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.venue_id)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO ticket_types (event_id, name, price, quantity_available)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            crate::repositories::ticket_type_repo::COLUMNS
        );
        let ticket_type = sqlx::query_as::<_, TicketType>(&query)
            .bind(event.id)
            .bind(DEFAULT_TICKET_TYPE_NAME)
            .bind(input.price_per_ticket)
            .bind(input.number_of_tickets)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((event, ticket_type))
    }

    /// Find an event row by id.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all event rows ordered by start date (ascending), id as tie-breaker.
    pub async fn list(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events ORDER BY start_date ASC, id ASC");
        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// List all events with venue, ticket types and add-ons expanded.
    pub async fn list_with_relations(
        pool: &PgPool,
    ) -> Result<Vec<EventWithRelations>, sqlx::Error> {
        let events = Self::list(pool).await?;
        Self::expand(pool, events).await
    }

    /// Find one event with its relations expanded.
    pub async fn find_with_relations(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<EventWithRelations>, sqlx::Error> {
        let Some(event) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Ok(Self::expand(pool, vec![event]).await?.into_iter().next())
    }

    /// Replace the media URL list of an event.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_media_urls(
        pool: &PgPool,
        id: EntityId,
        media_urls: &[String],
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET media_urls = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(media_urls)
            .fetch_optional(pool)
            .await
    }

    async fn expand(
        pool: &PgPool,
        events: Vec<Event>,
    ) -> Result<Vec<EventWithRelations>, sqlx::Error> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let event_ids: Vec<EntityId> = events.iter().map(|e| e.id).collect();
        let mut venue_ids: Vec<EntityId> = events.iter().map(|e| e.venue_id).collect();
        venue_ids.sort_unstable();
        venue_ids.dedup();

        let venues = VenueRepo::find_by_ids(pool, &venue_ids).await?;
        let ticket_types = TicketTypeRepo::list_by_events(pool, &event_ids).await?;
        let links = AddOnRepo::list_links_by_events(pool, &event_ids).await?;

        let mut add_on_ids: Vec<EntityId> = links.iter().map(|l| l.add_on_id).collect();
        add_on_ids.sort_unstable();
        add_on_ids.dedup();
        let add_ons = AddOnRepo::find_by_ids(pool, &add_on_ids).await?;

        Ok(EventWithRelations::assemble(
            events,
            venues,
            ticket_types,
            links,
            add_ons,
        ))
    }
}
