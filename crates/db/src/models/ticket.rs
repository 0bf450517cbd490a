//! Purchased ticket model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchgrass_core::error::CoreError;
use touchgrass_core::ticket_status::TicketStatus;
use touchgrass_core::types::{EntityId, Timestamp};

/// A row from the `tickets` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Ticket {
    pub id: EntityId,
    pub ticket_type_id: EntityId,
    pub purchaser_id: EntityId,
    pub purchase_date: Timestamp,
    pub status: String,
    pub created_at: Timestamp,
}

impl Ticket {
    pub fn status(&self) -> Result<TicketStatus, CoreError> {
        TicketStatus::from_name(&self.status)
    }
}

/// DTO for recording a ticket purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicket {
    pub ticket_type_id: EntityId,
    pub purchaser_id: EntityId,
}
