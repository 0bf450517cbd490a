//! Role assignments for authenticated users.

use serde::Serialize;
use sqlx::FromRow;
use touchgrass_core::types::{EntityId, Timestamp};

/// A row from the `user_roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRole {
    pub user_id: EntityId,
    pub role: String,
    pub created_at: Timestamp,
}
