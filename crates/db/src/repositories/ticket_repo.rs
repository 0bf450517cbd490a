//! Repository for the `tickets` table.

use sqlx::PgPool;
use touchgrass_core::ticket_status::TicketStatus;
use touchgrass_core::types::EntityId;

use crate::models::ticket::{CreateTicket, Ticket};

const COLUMNS: &str = "id, ticket_type_id, purchaser_id, purchase_date, status, created_at";

/// Provides purchase and lifecycle operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Record a purchase. New tickets start `active`.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (ticket_type_id, purchaser_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.ticket_type_id)
            .bind(input.purchaser_id)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by id.
    pub async fn find_by_id(pool: &PgPool, id: EntityId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Move a ticket from `from` to `to`.
    ///
    /// The `status = $2` guard makes the update a compare-and-set: returns
    /// `None` if the ticket does not exist or is no longer in `from`.
    pub async fn update_status(
        pool: &PgPool,
        id: EntityId,
        from: TicketStatus,
        to: TicketStatus,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }
}
