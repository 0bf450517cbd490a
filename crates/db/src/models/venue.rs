//! Venue entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use touchgrass_core::types::{EntityId, Timestamp};

/// A venue row from the `venues` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Venue {
    pub id: EntityId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    /// Free-text tags describing the venue.
    pub description: Vec<String>,
    pub capacity: i32,
    pub rental_rate_per_hour: f64,
    pub is_active: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub media_urls: Vec<String>,
    pub created_at: Timestamp,
}
