//! Repository for the `add_ons` catalogue and the `event_add_ons` join.

use sqlx::PgPool;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::NewAddOn;

use crate::models::add_on::{AddOn, AttachAddOn, EventAddOn};

const ADD_ON_COLUMNS: &str = "id, name, description, price, created_at";
const LINK_COLUMNS: &str = "id, event_id, add_on_id, price, created_at";

/// Provides operations on add-ons and their attachment to events.
pub struct AddOnRepo;

impl AddOnRepo {
    /// Insert a catalogue add-on.
    pub async fn create(pool: &PgPool, input: &NewAddOn) -> Result<AddOn, sqlx::Error> {
        let query = format!(
            "INSERT INTO add_ons (name, description, price)
             VALUES ($1, $2, $3)
             RETURNING {ADD_ON_COLUMNS}"
        );
        sqlx::query_as::<_, AddOn>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .fetch_one(pool)
            .await
    }

    /// Find every add-on whose id is in `ids`.
    pub async fn find_by_ids(pool: &PgPool, ids: &[EntityId]) -> Result<Vec<AddOn>, sqlx::Error> {
        let query = format!("SELECT {ADD_ON_COLUMNS} FROM add_ons WHERE id = ANY($1)");
        sqlx::query_as::<_, AddOn>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Attach an add-on to an event with an optional price override.
    ///
    /// Attaching the same add-on twice violates `uq_event_add_ons_event_add_on`.
    pub async fn attach(
        pool: &PgPool,
        event_id: EntityId,
        input: &AttachAddOn,
    ) -> Result<EventAddOn, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_add_ons (event_id, add_on_id, price)
             VALUES ($1, $2, $3)
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, EventAddOn>(&query)
            .bind(event_id)
            .bind(input.add_on_id)
            .bind(input.price)
            .fetch_one(pool)
            .await
    }

    /// List event/add-on links for the given events, oldest first.
    pub async fn list_links_by_events(
        pool: &PgPool,
        event_ids: &[EntityId],
    ) -> Result<Vec<EventAddOn>, sqlx::Error> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM event_add_ons
             WHERE event_id = ANY($1)
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, EventAddOn>(&query)
            .bind(event_ids)
            .fetch_all(pool)
            .await
    }
}
