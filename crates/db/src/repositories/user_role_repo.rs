//! Repository for the `user_roles` table.

use sqlx::PgPool;
use touchgrass_core::types::EntityId;

use crate::models::user_role::UserRole;

/// Reads and assigns user roles.
pub struct UserRoleRepo;

impl UserRoleRepo {
    /// The role name granted to `user_id`, if any.
    pub async fn find_role(pool: &PgPool, user_id: EntityId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Grant `role` to `user_id`, replacing any previous role.
    pub async fn assign(
        pool: &PgPool,
        user_id: EntityId,
        role: &str,
    ) -> Result<UserRole, sqlx::Error> {
        sqlx::query_as::<_, UserRole>(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role
             RETURNING user_id, role, created_at",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await
    }
}
