//! Role-based access control extractors.
//!
//! Roles live in `user_roles`, so each check costs one store lookup.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use touchgrass_core::error::CoreError;
use touchgrass_core::roles::can_manage_listings;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `organizer` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn create(RequireOrganizer(user): RequireOrganizer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireOrganizer(pub AuthUser);

impl FromRequestParts<AppState> for RequireOrganizer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let role = state.store.user_role(user.user_id).await?;
        match role.as_deref() {
            Some(role) if can_manage_listings(role) => Ok(RequireOrganizer(user)),
            _ => {
                tracing::debug!(user_id = %user.user_id, ?role, "Listing management refused");
                Err(AppError::Core(CoreError::Forbidden(
                    "Organizer or Admin role required".into(),
                )))
            }
        }
    }
}
