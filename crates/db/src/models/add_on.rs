//! Add-on catalogue and the event/add-on join.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchgrass_core::types::{EntityId, Timestamp};

/// A row from the `add_ons` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AddOn {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: Timestamp,
}

/// A row from the `event_add_ons` join table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct EventAddOn {
    pub id: EntityId,
    pub event_id: EntityId,
    pub add_on_id: EntityId,
    /// Overrides `add_ons.price` for this event when set.
    pub price: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for attaching an existing add-on to an event.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachAddOn {
    pub add_on_id: EntityId,
    pub price: Option<f64>,
}

/// An event/add-on link with the add-on expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAddOnDetail {
    #[serde(flatten)]
    pub link: EventAddOn,
    pub add_ons: AddOn,
}

impl EventAddOnDetail {
    /// Price charged for this add-on at this event.
    pub fn effective_price(&self) -> f64 {
        self.link.price.unwrap_or(self.add_ons.price)
    }
}
