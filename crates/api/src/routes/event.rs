use axum::routing::{get, post};
use axum::Router;

use crate::handlers::event;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                    -> list
/// POST   /                    -> create (multipart)
/// GET    /{id}                -> get_by_id
/// GET    /{id}/media          -> list_media
/// POST   /{id}/ticket-types   -> create_ticket_type
/// POST   /{id}/add-ons        -> attach_add_on
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(event::list).post(event::create))
        .route("/{id}", get(event::get_by_id))
        .route("/{id}/media", get(event::list_media))
        .route("/{id}/ticket-types", post(event::create_ticket_type))
        .route("/{id}/add-ons", post(event::attach_add_on))
}
