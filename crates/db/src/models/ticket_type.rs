//! Ticket type model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchgrass_core::types::{EntityId, Timestamp};

/// Name given to the ticket type created alongside every new event.
pub const DEFAULT_TICKET_TYPE_NAME: &str = "General Admission";

/// A row from the `ticket_types` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TicketType {
    pub id: EntityId,
    pub event_id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity_available: Option<i32>,
    pub start_sales_date: Option<Timestamp>,
    pub end_sales_date: Option<Timestamp>,
    pub created_at: Timestamp,
}
