//! Repository for the `ticket_types` table.

use sqlx::PgPool;
use touchgrass_core::types::EntityId;
use touchgrass_core::validation::NewTicketType;

use crate::models::ticket_type::TicketType;

pub(crate) const COLUMNS: &str = "id, event_id, name, description, price, quantity_available, \
     start_sales_date, end_sales_date, created_at";

/// Provides create/read operations for ticket types.
pub struct TicketTypeRepo;

impl TicketTypeRepo {
    /// Insert a ticket type for an existing event.
    pub async fn create(pool: &PgPool, input: &NewTicketType) -> Result<TicketType, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_types
                (event_id, name, description, price, quantity_available,
                 start_sales_date, end_sales_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketType>(&query)
            .bind(input.event_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.quantity_available)
            .bind(input.start_sales_date)
            .bind(input.end_sales_date)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket type by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<TicketType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ticket_types WHERE id = $1");
        sqlx::query_as::<_, TicketType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the ticket types of the given events, cheapest first.
    pub async fn list_by_events(
        pool: &PgPool,
        event_ids: &[EntityId],
    ) -> Result<Vec<TicketType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ticket_types
             WHERE event_id = ANY($1)
             ORDER BY price ASC, created_at ASC"
        );
        sqlx::query_as::<_, TicketType>(&query)
            .bind(event_ids)
            .fetch_all(pool)
            .await
    }
}
